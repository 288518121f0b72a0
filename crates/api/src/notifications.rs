//! Notification fan-out: in-app rows plus email.
//!
//! Recipients, titles and links come from `servicecore_core::notify`. A
//! failed insert fails the request; a failed email is only logged.

use servicecore_core::notify::{
    self, comment_recipients, update_recipients, LinkTarget, TicketParties,
};
use servicecore_core::types::DbId;
use servicecore_db::models::notification::NewNotification;
use servicecore_db::models::ticket::Ticket;
use servicecore_db::repositories::{NotificationRepo, UserRepo};

use crate::error::AppResult;
use crate::state::AppState;

fn parties(ticket: &Ticket) -> TicketParties {
    TicketParties {
        requester_id: ticket.requester_id,
        assignee_id: ticket.assigned_to_id,
    }
}

/// Write one notification row and email the user.
///
/// Unknown users are skipped.
pub async fn notify_user(
    state: &AppState,
    user_id: DbId,
    title: &str,
    message: &str,
    link: Option<String>,
) -> AppResult<()> {
    let Some(user) = UserRepo::find_by_id(&state.pool, user_id).await? else {
        tracing::debug!(user_id, "Skipping notification for unknown user");
        return Ok(());
    };

    NotificationRepo::create(
        &state.pool,
        &NewNotification {
            user_id,
            title: title.to_string(),
            message: message.to_string(),
            link,
        },
    )
    .await?;

    if !user.email.is_empty() {
        if let Err(e) = state.mailer.send(&user.email, title, message).await {
            tracing::warn!(user_id, error = %e, "Failed to send notification email");
        }
    }
    Ok(())
}

/// Tell the requester (and a distinct assignee) that a ticket changed.
pub async fn ticket_updated(state: &AppState, ticket: &Ticket, message: &str) -> AppResult<()> {
    let title = notify::update_title(ticket.id);
    for recipient in update_recipients(parties(ticket)) {
        notify_user(
            state,
            recipient.user_id,
            &title,
            message,
            Some(recipient.target.link(ticket.id)),
        )
        .await?;
    }
    tracing::debug!(ticket_id = ticket.id, "Ticket update fan-out complete");
    Ok(())
}

/// Tell the other parties on a ticket about a new comment.
pub async fn comment_added(
    state: &AppState,
    ticket: &Ticket,
    commenter_id: DbId,
    author_name: Option<&str>,
    content: &str,
) -> AppResult<()> {
    let title = notify::comment_title(ticket.id);
    let message = notify::comment_message(author_name, content);
    for recipient in comment_recipients(parties(ticket), commenter_id) {
        notify_user(
            state,
            recipient.user_id,
            &title,
            &message,
            Some(recipient.target.link(ticket.id)),
        )
        .await?;
    }
    Ok(())
}

/// Tell a new assignee they now own the ticket.
pub async fn ticket_assigned(state: &AppState, ticket: &Ticket, assignee_id: DbId) -> AppResult<()> {
    notify_user(
        state,
        assignee_id,
        &notify::assigned_title(ticket.id),
        &format!("You have been assigned ticket #{}: {}", ticket.id, ticket.subject),
        Some(LinkTarget::Manager.link(ticket.id)),
    )
    .await
}

/// Nudge the assignee about an open ticket.
pub async fn ticket_reminder(state: &AppState, ticket: &Ticket, assignee_id: DbId) -> AppResult<()> {
    notify_user(
        state,
        assignee_id,
        &notify::reminder_title(ticket.id),
        &format!("Reminder: ticket #{} - {}", ticket.id, ticket.subject),
        Some(LinkTarget::Manager.link(ticket.id)),
    )
    .await
}
