//! Ticket workflow rules: initial status, resolution-date bookkeeping,
//! category tree flattening and related knowledge-base matching.

use serde::Serialize;

use crate::types::{DbId, Timestamp};

pub const STATUS_NEW: &str = "New";
pub const STATUS_OPEN: &str = "Open";
pub const STATUS_IN_PROGRESS: &str = "In Progress";
pub const STATUS_RESOLVED: &str = "Resolved";
pub const STATUS_CLOSED: &str = "Closed";

/// Statuses that count a ticket as finished for dashboards and SLA.
pub const FINISHED_STATUSES: &[&str] = &[STATUS_CLOSED, STATUS_RESOLVED];

/// Filter value on the manager list that restricts to the caller's tickets.
pub const FILTER_MINE: &str = "my";

/// Tickets older than this many days while still open are flagged stale.
pub const STALE_AFTER_DAYS: i64 = 7;

/// How many related solutions a ticket detail shows.
pub const RELATED_SOLUTION_LIMIT: usize = 5;

/// A `(id, name)` pair from the `ticket_statuses` table.
pub type StatusRef<'a> = (DbId, &'a str);

/// Pick the status a new ticket starts in: `Open`, then `New`, then the
/// first configured status.
pub fn initial_status(statuses: &[StatusRef<'_>]) -> Option<DbId> {
    [STATUS_OPEN, STATUS_NEW]
        .iter()
        .find_map(|wanted| {
            statuses
                .iter()
                .find(|(_, name)| name.eq_ignore_ascii_case(wanted))
                .map(|(id, _)| *id)
        })
        .or_else(|| statuses.first().map(|(id, _)| *id))
}

/// Pick the status the resolve action moves to: `Resolved`, else `Closed`.
pub fn resolve_status(statuses: &[StatusRef<'_>]) -> Option<DbId> {
    [STATUS_RESOLVED, STATUS_CLOSED].iter().find_map(|wanted| {
        statuses
            .iter()
            .find(|(_, name)| name.eq_ignore_ascii_case(wanted))
            .map(|(id, _)| *id)
    })
}

pub fn is_closed(status_name: &str) -> bool {
    status_name.eq_ignore_ascii_case(STATUS_CLOSED)
}

pub fn is_finished(status_name: &str) -> bool {
    FINISHED_STATUSES
        .iter()
        .any(|s| s.eq_ignore_ascii_case(status_name))
}

/// What to do with `resolution_date` when a ticket changes status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionChange {
    Keep,
    Set(Timestamp),
    Clear,
}

impl ResolutionChange {
    /// Apply the change to the current value.
    pub fn apply(self, current: Option<Timestamp>) -> Option<Timestamp> {
        match self {
            ResolutionChange::Keep => current,
            ResolutionChange::Set(at) => Some(at),
            ResolutionChange::Clear => None,
        }
    }
}

/// Moving into Closed stamps the resolution date; moving out of Closed
/// (a reopen) clears it.
pub fn resolution_change(old_status: &str, new_status: &str, now: Timestamp) -> ResolutionChange {
    match (is_closed(old_status), is_closed(new_status)) {
        (false, true) => ResolutionChange::Set(now),
        (true, false) => ResolutionChange::Clear,
        _ => ResolutionChange::Keep,
    }
}

// ---------------------------------------------------------------------------
// Category tree
// ---------------------------------------------------------------------------

/// A ticket category as stored (flat, with an optional parent).
#[derive(Debug, Clone)]
pub struct CategoryNode {
    pub id: DbId,
    pub name: String,
    pub parent_id: Option<DbId>,
}

/// A category prepared for a picker: indented name and depth.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FlatCategory {
    pub id: DbId,
    pub name: String,
    pub display_name: String,
    pub depth: usize,
}

const INDENT_UNIT: &str = "\u{a0}\u{a0}\u{a0}\u{a0}";
const BRANCH_MARK: &str = "\u{2514}\u{2500} ";

/// Flatten the category forest depth-first. Siblings are sorted by name and
/// children are indented under their parent.
pub fn flatten_categories(nodes: &[CategoryNode]) -> Vec<FlatCategory> {
    let mut out = Vec::with_capacity(nodes.len());
    let known: Vec<DbId> = nodes.iter().map(|n| n.id).collect();
    // Orphans (parent missing) are treated as roots so nothing disappears.
    let mut roots: Vec<&CategoryNode> = nodes
        .iter()
        .filter(|n| n.parent_id.map_or(true, |p| !known.contains(&p)))
        .collect();
    roots.sort_by(|a, b| a.name.cmp(&b.name));
    for root in roots {
        push_branch(nodes, root, 0, &mut out);
    }
    out
}

fn push_branch(
    nodes: &[CategoryNode],
    node: &CategoryNode,
    depth: usize,
    out: &mut Vec<FlatCategory>,
) {
    if out.iter().any(|c| c.id == node.id) {
        return;
    }
    let display_name = if depth == 0 {
        node.name.clone()
    } else {
        format!("{}{}{}", INDENT_UNIT.repeat(depth), BRANCH_MARK, node.name)
    };
    out.push(FlatCategory {
        id: node.id,
        name: node.name.clone(),
        display_name,
        depth,
    });

    let mut children: Vec<&CategoryNode> = nodes
        .iter()
        .filter(|n| n.parent_id == Some(node.id))
        .collect();
    children.sort_by(|a, b| a.name.cmp(&b.name));
    for child in children {
        push_branch(nodes, child, depth + 1, out);
    }
}

// ---------------------------------------------------------------------------
// Related solutions
// ---------------------------------------------------------------------------

/// The ticket text a knowledge-base article is matched against.
#[derive(Debug, Clone, Copy)]
pub struct TicketText<'a> {
    pub subject: &'a str,
    pub description: Option<&'a str>,
    pub category_name: Option<&'a str>,
}

/// The solution fields used for matching.
#[derive(Debug, Clone, Copy)]
pub struct SolutionText<'a> {
    pub title: &'a str,
    pub keywords: Option<&'a str>,
    pub topic_name: Option<&'a str>,
}

/// A published solution relates to a ticket when its topic name appears in
/// the ticket's category name, or its title or keyword string appears in the
/// ticket's subject and description. Comparison is case-insensitive.
pub fn solution_matches(ticket: &TicketText<'_>, solution: &SolutionText<'_>) -> bool {
    let category = ticket.category_name.unwrap_or_default().to_lowercase();
    let haystack = format!(
        "{} {}",
        ticket.subject,
        ticket.description.unwrap_or_default()
    )
    .to_lowercase();

    let topic_hit = solution
        .topic_name
        .map(str::to_lowercase)
        .is_some_and(|t| !t.is_empty() && !category.is_empty() && category.contains(&t));
    let title = solution.title.to_lowercase();
    let title_hit = !title.is_empty() && haystack.contains(&title);
    let keyword_hit = solution
        .keywords
        .map(str::to_lowercase)
        .is_some_and(|k| !k.is_empty() && haystack.contains(&k));

    topic_hit || title_hit || keyword_hit
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_initial_status_prefers_open() {
        let statuses = [(1, "New"), (2, "Open"), (3, "Closed")];
        assert_eq!(initial_status(&statuses), Some(2));
    }

    #[test]
    fn test_initial_status_falls_back() {
        assert_eq!(initial_status(&[(5, "New"), (6, "Closed")]), Some(5));
        assert_eq!(initial_status(&[(9, "Triage")]), Some(9));
        assert_eq!(initial_status(&[]), None);
    }

    #[test]
    fn test_resolve_status_prefers_resolved() {
        assert_eq!(resolve_status(&[(1, "Open"), (3, "Resolved"), (4, "Closed")]), Some(3));
        assert_eq!(resolve_status(&[(1, "Open"), (4, "Closed")]), Some(4));
        assert_eq!(resolve_status(&[(1, "Open")]), None);
    }

    #[test]
    fn test_closing_sets_resolution_date() {
        let now = Utc::now();
        assert_eq!(
            resolution_change("In Progress", "Closed", now),
            ResolutionChange::Set(now)
        );
    }

    #[test]
    fn test_reopen_clears_resolution_date() {
        let now = Utc::now();
        let change = resolution_change("Closed", "Open", now);
        assert_eq!(change, ResolutionChange::Clear);
        assert_eq!(change.apply(Some(now)), None);
    }

    #[test]
    fn test_other_moves_keep_resolution_date() {
        let now = Utc::now();
        let change = resolution_change("Open", "In Progress", now);
        assert_eq!(change, ResolutionChange::Keep);
        assert_eq!(change.apply(Some(now)), Some(now));
    }

    #[test]
    fn test_flatten_categories_orders_and_indents() {
        let nodes = vec![
            CategoryNode { id: 1, name: "Software".into(), parent_id: None },
            CategoryNode { id: 2, name: "Hardware".into(), parent_id: None },
            CategoryNode { id: 3, name: "Printers".into(), parent_id: Some(2) },
            CategoryNode { id: 4, name: "Laptops".into(), parent_id: Some(2) },
            CategoryNode { id: 5, name: "Toner".into(), parent_id: Some(3) },
        ];
        let flat = flatten_categories(&nodes);
        let ids: Vec<DbId> = flat.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![2, 4, 3, 5, 1]);
        assert_eq!(flat[0].display_name, "Hardware");
        assert_eq!(flat[1].depth, 1);
        assert!(flat[1].display_name.ends_with("\u{2514}\u{2500} Laptops"));
        assert_eq!(flat[3].depth, 2);
    }

    #[test]
    fn test_flatten_categories_keeps_orphans() {
        let nodes = vec![CategoryNode { id: 7, name: "Lost".into(), parent_id: Some(99) }];
        let flat = flatten_categories(&nodes);
        assert_eq!(flat.len(), 1);
        assert_eq!(flat[0].depth, 0);
    }

    #[test]
    fn test_solution_matches_on_topic_title_or_keywords() {
        let ticket = TicketText {
            subject: "VPN drops every hour",
            description: Some("Reset password did not help"),
            category_name: Some("Network Access"),
        };

        let by_topic = SolutionText { title: "Unrelated", keywords: None, topic_name: Some("Network") };
        let by_title = SolutionText { title: "Reset Password", keywords: None, topic_name: None };
        let by_keywords = SolutionText { title: "x", keywords: Some("vpn"), topic_name: None };
        let miss = SolutionText { title: "Printer jams", keywords: Some("toner"), topic_name: Some("Email") };

        assert!(solution_matches(&ticket, &by_topic));
        assert!(solution_matches(&ticket, &by_title));
        assert!(solution_matches(&ticket, &by_keywords));
        assert!(!solution_matches(&ticket, &miss));
    }
}
