use tracing::{debug, info, warn};

use crate::context::AppContext;
use crate::domain::branch::BranchRef;
use crate::domain::ticket::TicketKey;
use crate::domain::ticket_key::TicketKeyMatcher;
use crate::error::AppResult;

/// Finds the tickets referenced by commits on `head` that are not on `base`.
///
/// Every referenced key must belong to a project the tracker knows about;
/// a single unknown or malformed key fails the whole lookup.
pub async fn find_related_tickets(
    ctx: &AppContext,
    base: &str,
    head: &str,
    in_ci: bool,
) -> AppResult<Vec<TicketKey>> {
    let remote = in_ci.then_some(ctx.config.git_remote.as_str());
    let base = BranchRef::resolve(base, remote);
    let head = BranchRef::resolve(head, remote);

    let log = ctx.version_control.commit_log(&base, &head).await?;
    let matcher = TicketKeyMatcher::new()?;
    let candidates = matcher.extract_candidates(&log);
    debug!(range = %BranchRef::range(&base, &head), candidates = ?candidates, "Extracted ticket candidates");

    let projects = ctx.issue_tracker.list_projects().await?;
    match matcher.verify_candidates(candidates, &projects) {
        Ok(tickets) => {
            info!(count = tickets.len(), "Verified related tickets");
            Ok(tickets)
        }
        Err(err) => {
            warn!(error = %err, "Commit history references an unknown ticket");
            Err(err)
        }
    }
}
