//! Ticket code generation and issuance.

use rand::Rng;
use sqlx::PgConnection;
use uuid::Uuid;

use crate::models::ticket::Ticket;
use crate::repositories::tickets;

pub const TICKET_CODE_LEN: usize = 8;
const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Draws a random code of `TICKET_CODE_LEN` uppercase alphanumerics.
pub fn generate_ticket_code() -> String {
    let mut rng = rand::thread_rng();

    (0..TICKET_CODE_LEN)
        .map(|_| {
            let idx = rng.gen_range(0..CHARSET.len());
            CHARSET[idx] as char
        })
        .collect()
}

/// Issues an active ticket for (user, event) on `conn`, which is expected to
/// be the caller's open transaction.
///
/// Uniqueness is decided by the `tickets.ticket_code` constraint rather than
/// a prior lookup; a colliding code is redrawn until an insert succeeds.
pub async fn issue_ticket(
    conn: &mut PgConnection,
    user_id: Uuid,
    event_id: Uuid,
) -> Result<Ticket, sqlx::Error> {
    loop {
        let code = generate_ticket_code();
        match tickets::insert_if_code_free(&mut *conn, user_id, event_id, &code).await? {
            Some(ticket) => {
                tracing::debug!(ticket_id = %ticket.id, %event_id, %user_id, "Ticket issued");
                return Ok(ticket);
            }
            None => {
                tracing::debug!(%code, "Ticket code collision, drawing another");
            }
        }
    }
}
