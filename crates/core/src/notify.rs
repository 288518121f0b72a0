//! Who hears about a ticket change, and what they are told.
//!
//! The API layer resolves users and writes the rows; this module only
//! decides recipients, titles, links and message text.

use crate::types::DbId;

/// Comment bodies longer than this are shortened in notification text.
pub const PREVIEW_MAX_CHARS: usize = 50;

/// Characters kept before the ellipsis when a preview is shortened.
const PREVIEW_KEEP_CHARS: usize = 47;

/// Name used when the commenter cannot be resolved.
const UNKNOWN_AUTHOR: &str = "Someone";

/// Which screen a notification link should open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkTarget {
    /// The requester's ticket view.
    Requester,
    /// The manager workspace view (assignees).
    Manager,
}

impl LinkTarget {
    pub fn link(self, ticket_id: DbId) -> String {
        match self {
            LinkTarget::Requester => format!("/tickets/{ticket_id}"),
            LinkTarget::Manager => format!("/tickets-manager/{ticket_id}"),
        }
    }
}

/// A single notification to deliver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recipient {
    pub user_id: DbId,
    pub target: LinkTarget,
}

/// Parties on a ticket.
#[derive(Debug, Clone, Copy)]
pub struct TicketParties {
    pub requester_id: DbId,
    pub assignee_id: Option<DbId>,
}

/// Recipients for a ticket update: the requester, then the assignee when
/// there is one distinct from the requester.
pub fn update_recipients(parties: TicketParties) -> Vec<Recipient> {
    let mut out = vec![Recipient {
        user_id: parties.requester_id,
        target: LinkTarget::Requester,
    }];
    if let Some(assignee) = parties.assignee_id {
        if assignee != parties.requester_id {
            out.push(Recipient {
                user_id: assignee,
                target: LinkTarget::Manager,
            });
        }
    }
    out
}

/// Recipients for a new comment. The commenter is never notified.
///
/// - requester commented: the assignee hears about it
/// - assignee commented: the requester hears about it
/// - anyone else: both parties
pub fn comment_recipients(parties: TicketParties, commenter_id: DbId) -> Vec<Recipient> {
    let requester = Recipient {
        user_id: parties.requester_id,
        target: LinkTarget::Requester,
    };
    let assignee = parties.assignee_id.map(|id| Recipient {
        user_id: id,
        target: LinkTarget::Manager,
    });

    let mut out = Vec::with_capacity(2);
    if commenter_id == parties.requester_id {
        out.extend(assignee);
    } else if parties.assignee_id == Some(commenter_id) {
        out.push(requester);
    } else {
        out.push(requester);
        out.extend(assignee);
    }
    out.retain(|r| r.user_id != commenter_id);
    out.dedup_by_key(|r| r.user_id);
    out
}

pub fn update_title(ticket_id: DbId) -> String {
    format!("Ticket #{ticket_id} Updated")
}

pub fn comment_title(ticket_id: DbId) -> String {
    format!("New Comment on Ticket #{ticket_id}")
}

pub fn assigned_title(ticket_id: DbId) -> String {
    format!("Ticket #{ticket_id} Assigned")
}

pub fn reminder_title(ticket_id: DbId) -> String {
    format!("Reminder: Ticket #{ticket_id}")
}

/// Shorten a comment body for notification text.
pub fn comment_preview(content: &str) -> String {
    if content.chars().count() > PREVIEW_MAX_CHARS {
        let kept: String = content.chars().take(PREVIEW_KEEP_CHARS).collect();
        format!("{kept}...")
    } else {
        content.to_string()
    }
}

/// `"{author} added a comment: \"{preview}\""`
pub fn comment_message(author: Option<&str>, content: &str) -> String {
    let author = author
        .filter(|a| !a.trim().is_empty())
        .unwrap_or(UNKNOWN_AUTHOR);
    format!("{author} added a comment: \"{}\"", comment_preview(content))
}
