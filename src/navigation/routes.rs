//! Static route table.
//!
//! The table is the only place that knows URL shapes. Inbound resolution and
//! outbound link generation both walk it, so a link can never point at a path
//! the resolver does not accept.

use once_cell::sync::Lazy;
use serde::Serialize;

use super::identity::{MalformedIdentity, WorkflowIdentity};

/// Every view the dashboard can show
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewSelector {
    Dashboard,
    WorkflowList,
    StageTrace,
    HostList,
    Analytics,
    Placeholder(&'static str),
    NotFound,
}

impl ViewSelector {
    /// Stable machine name used by the JSON API
    pub fn name(&self) -> &'static str {
        match self {
            ViewSelector::Dashboard => "dashboard",
            ViewSelector::WorkflowList => "workflow_list",
            ViewSelector::StageTrace => "stage_trace",
            ViewSelector::HostList => "host_list",
            ViewSelector::Analytics => "analytics",
            ViewSelector::Placeholder(_) => "placeholder",
            ViewSelector::NotFound => "not_found",
        }
    }

    pub fn label(&self) -> Option<&'static str> {
        match self {
            ViewSelector::Placeholder(label) => Some(label),
            _ => None,
        }
    }

    /// Whether the view renders records from the data service
    pub fn is_data_view(&self) -> bool {
        matches!(
            self,
            ViewSelector::Dashboard
                | ViewSelector::WorkflowList
                | ViewSelector::StageTrace
                | ViewSelector::HostList
                | ViewSelector::Analytics
        )
    }

    pub fn requires_identity(&self) -> bool {
        matches!(self, ViewSelector::StageTrace)
    }
}

impl Serialize for ViewSelector {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

/// Named parameter inside a route pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Param {
    Hostname,
    TransactionId,
}

/// One path segment of a route pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment {
    Literal(&'static str),
    Param(Param),
}

/// A pattern and the view it selects
#[derive(Debug, Clone)]
pub struct RouteEntry {
    segments: &'static [Segment],
    view: ViewSelector,
}

/// Outcome of matching raw path segments against one entry
#[derive(Debug, PartialEq, Eq)]
pub enum EntryMatch {
    /// Shape differs, try the next entry
    Miss,
    /// Shape matches and parameters decoded
    Hit(Option<WorkflowIdentity>),
    /// Shape matches but parameters are unusable
    Malformed(MalformedIdentity),
}

impl RouteEntry {
    pub const fn new(segments: &'static [Segment], view: ViewSelector) -> Self {
        Self { segments, view }
    }

    pub fn view(&self) -> ViewSelector {
        self.view
    }

    pub fn segments(&self) -> &'static [Segment] {
        self.segments
    }

    /// Human readable pattern, e.g. `/workflows/{hostname}/{transaction_id}/stages`
    pub fn pattern(&self) -> String {
        if self.segments.is_empty() {
            return "/".to_string();
        }
        self.segments
            .iter()
            .map(|segment| match segment {
                Segment::Literal(literal) => format!("/{}", literal),
                Segment::Param(Param::Hostname) => "/{hostname}".to_string(),
                Segment::Param(Param::TransactionId) => "/{transaction_id}".to_string(),
            })
            .collect()
    }

    fn literal_count(&self) -> usize {
        self.segments
            .iter()
            .filter(|segment| matches!(segment, Segment::Literal(_)))
            .count()
    }

    fn has_params(&self) -> bool {
        self.segments.len() != self.literal_count()
    }

    /// Match raw, still percent-encoded, path segments
    pub fn matches(&self, raw: &[&str]) -> EntryMatch {
        if raw.len() != self.segments.len() {
            return EntryMatch::Miss;
        }

        let mut hostname = None;
        let mut transaction_id = None;

        for (segment, value) in self.segments.iter().zip(raw) {
            match segment {
                Segment::Literal(literal) => {
                    if literal != value {
                        return EntryMatch::Miss;
                    }
                }
                Segment::Param(Param::Hostname) => hostname = Some(*value),
                Segment::Param(Param::TransactionId) => transaction_id = Some(*value),
            }
        }

        if !self.has_params() {
            return EntryMatch::Hit(None);
        }

        match WorkflowIdentity::from_segments(
            hostname.unwrap_or_default(),
            transaction_id.unwrap_or_default(),
        ) {
            Ok(identity) => EntryMatch::Hit(Some(identity)),
            Err(e) => EntryMatch::Malformed(e),
        }
    }

    /// Fill the pattern in; `None` when a parameter has no value
    pub fn build(&self, identity: Option<&WorkflowIdentity>) -> Option<String> {
        if self.segments.is_empty() {
            return Some("/".to_string());
        }

        let mut path = String::new();
        for segment in self.segments {
            path.push('/');
            match segment {
                Segment::Literal(literal) => path.push_str(literal),
                Segment::Param(Param::Hostname) => path.push_str(&identity?.encoded_hostname()),
                Segment::Param(Param::TransactionId) => {
                    path.push_str(&identity?.encoded_transaction_id())
                }
            }
        }
        Some(path)
    }
}

const ROOT: &[Segment] = &[];
const WORKFLOWS: &[Segment] = &[Segment::Literal("workflows")];
const STAGES: &[Segment] = &[
    Segment::Literal("workflows"),
    Segment::Param(Param::Hostname),
    Segment::Param(Param::TransactionId),
    Segment::Literal("stages"),
];
const HOSTS: &[Segment] = &[Segment::Literal("hosts")];
const ANALYTICS: &[Segment] = &[Segment::Literal("analytics")];
const KNOWN_ISSUES: &[Segment] = &[Segment::Literal("docs"), Segment::Literal("knownIssues")];
const RELEASE_INFO: &[Segment] = &[Segment::Literal("docs"), Segment::Literal("releaseInfo")];
const END_USER_AGREEMENT: &[Segment] = &[
    Segment::Literal("docs"),
    Segment::Literal("endUserAgreement"),
];

/// Ordered, immutable route table
#[derive(Debug, Clone)]
pub struct RouteTable {
    entries: Vec<RouteEntry>,
}

impl RouteTable {
    /// Build a table, ordering entries most-specific-first
    pub fn new(mut entries: Vec<RouteEntry>) -> Self {
        // Longer patterns first, then more literal segments; stable for ties
        entries.sort_by(|a, b| {
            b.segments
                .len()
                .cmp(&a.segments.len())
                .then_with(|| b.literal_count().cmp(&a.literal_count()))
        });
        Self { entries }
    }

    /// The dashboard's route table
    pub fn standard() -> Self {
        Self::new(vec![
            RouteEntry::new(ROOT, ViewSelector::Dashboard),
            RouteEntry::new(WORKFLOWS, ViewSelector::WorkflowList),
            RouteEntry::new(STAGES, ViewSelector::StageTrace),
            RouteEntry::new(HOSTS, ViewSelector::HostList),
            RouteEntry::new(ANALYTICS, ViewSelector::Analytics),
            RouteEntry::new(KNOWN_ISSUES, ViewSelector::Placeholder("Known Issues")),
            RouteEntry::new(RELEASE_INFO, ViewSelector::Placeholder("Release Info")),
            RouteEntry::new(
                END_USER_AGREEMENT,
                ViewSelector::Placeholder("End User Agreement"),
            ),
        ])
    }

    pub fn entries(&self) -> &[RouteEntry] {
        &self.entries
    }

    pub fn entry_for(&self, view: ViewSelector) -> Option<&RouteEntry> {
        self.entries.iter().find(|entry| entry.view == view)
    }

    /// Look a view up by its API name (and label, for placeholders)
    pub fn view_named(&self, name: &str, label: Option<&str>) -> Option<ViewSelector> {
        self.entries
            .iter()
            .map(RouteEntry::view)
            .find(|view| view.name() == name && (view.label().is_none() || view.label() == label))
    }
}

pub static ROUTE_TABLE: Lazy<RouteTable> = Lazy::new(RouteTable::standard);
