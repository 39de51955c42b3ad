//! User lookups and the atomic get-or-create-by-name operation.

use super::{Database, now_ms};
use crate::types::User;
use anyhow::Result;
use rusqlite::{Connection, Row, params};
use uuid::Uuid;

/// Domain used for emails synthesized from a name on the adapter path.
pub const EMAIL_DOMAIN: &str = "taskmanager.com";

/// Synthesize the conventional email for a name: lower-cased, dot-joined.
pub fn email_for_name(first_name: &str, last_name: &str) -> String {
    format!(
        "{}.{}@{}",
        first_name.to_lowercase(),
        last_name.to_lowercase(),
        EMAIL_DOMAIN
    )
}

fn parse_user_row(row: &Row) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get("id")?,
        email: row.get("email")?,
        first_name: row.get("first_name")?,
        last_name: row.get("last_name")?,
        avatar_url: row.get("avatar_url")?,
        created_at: row.get("created_at")?,
    })
}

fn get_user_internal(conn: &Connection, user_id: &str) -> Result<Option<User>> {
    let mut stmt = conn.prepare("SELECT * FROM users WHERE id = ?1")?;
    match stmt.query_row(params![user_id], parse_user_row) {
        Ok(user) => Ok(Some(user)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

fn get_user_by_email_internal(conn: &Connection, email: &str) -> Result<Option<User>> {
    let mut stmt = conn.prepare("SELECT * FROM users WHERE email = ?1")?;
    match stmt.query_row(params![email], parse_user_row) {
        Ok(user) => Ok(Some(user)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

fn get_user_by_name_internal(
    conn: &Connection,
    first_name: &str,
    last_name: &str,
) -> Result<Option<User>> {
    let mut stmt =
        conn.prepare("SELECT * FROM users WHERE first_name = ?1 AND last_name = ?2")?;
    match stmt.query_row(params![first_name, last_name], parse_user_row) {
        Ok(user) => Ok(Some(user)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

impl Database {
    /// Get a user by id.
    pub fn get_user(&self, user_id: &str) -> Result<Option<User>> {
        self.with_conn(|conn| get_user_internal(conn, user_id))
    }

    /// Get a user by email (unique index).
    pub fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        self.with_conn(|conn| get_user_by_email_internal(conn, email))
    }

    /// Get a user by (firstName, lastName) via the unique name index.
    pub fn get_user_by_name(&self, first_name: &str, last_name: &str) -> Result<Option<User>> {
        self.with_conn(|conn| get_user_by_name_internal(conn, first_name, last_name))
    }

    /// Insert a user keyed by email, or patch name/avatar if the email exists.
    pub fn create_or_update_user(
        &self,
        email: &str,
        first_name: Option<&str>,
        last_name: Option<&str>,
        avatar_url: Option<&str>,
    ) -> Result<User> {
        self.with_conn_mut(|conn| {
            let tx = conn.transaction()?;

            let existing = get_user_by_email_internal(&tx, email)?;

            let user = match existing {
                Some(user) => {
                    tx.execute(
                        "UPDATE users SET first_name = ?1, last_name = ?2, avatar_url = ?3
                         WHERE id = ?4",
                        params![first_name, last_name, avatar_url, &user.id],
                    )?;
                    User {
                        first_name: first_name.map(String::from),
                        last_name: last_name.map(String::from),
                        avatar_url: avatar_url.map(String::from),
                        ..user
                    }
                }
                None => {
                    let user = User {
                        id: Uuid::now_v7().to_string(),
                        email: email.to_string(),
                        first_name: first_name.map(String::from),
                        last_name: last_name.map(String::from),
                        avatar_url: avatar_url.map(String::from),
                        created_at: now_ms(),
                    };
                    tx.execute(
                        "INSERT INTO users (id, email, first_name, last_name, avatar_url, created_at)
                         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                        params![
                            &user.id,
                            &user.email,
                            &user.first_name,
                            &user.last_name,
                            &user.avatar_url,
                            user.created_at,
                        ],
                    )?;
                    user
                }
            };

            tx.commit()?;
            Ok(user)
        })
    }

    /// Resolve a user by name, inserting one with a synthesized email when
    /// absent. Everything runs in one transaction against the unique name and
    /// email indexes, so simultaneous first-time callers converge on a single
    /// row.
    ///
    /// A case-variant spelling of a known name ("JANE DOE" after "Jane Doe")
    /// synthesizes the same email; it converges on that row and refreshes the
    /// stored name instead of tripping the email index.
    pub fn get_or_create_user(&self, first_name: &str, last_name: &str) -> Result<User> {
        self.with_conn_mut(|conn| {
            let tx = conn.transaction()?;

            if let Some(user) = get_user_by_name_internal(&tx, first_name, last_name)? {
                tx.commit()?;
                return Ok(user);
            }

            let email = email_for_name(first_name, last_name);
            let user = match get_user_by_email_internal(&tx, &email)? {
                Some(user) => {
                    tx.execute(
                        "UPDATE users SET first_name = ?1, last_name = ?2 WHERE id = ?3",
                        params![first_name, last_name, &user.id],
                    )?;
                    User {
                        first_name: Some(first_name.to_string()),
                        last_name: Some(last_name.to_string()),
                        ..user
                    }
                }
                None => {
                    let candidate_id = Uuid::now_v7().to_string();
                    tx.execute(
                        "INSERT INTO users (id, email, first_name, last_name, created_at)
                         VALUES (?1, ?2, ?3, ?4, ?5)
                         ON CONFLICT (first_name, last_name) DO NOTHING",
                        params![&candidate_id, &email, first_name, last_name, now_ms()],
                    )?;
                    get_user_by_name_internal(&tx, first_name, last_name)?.ok_or_else(|| {
                        anyhow::anyhow!("user row missing after conditional insert")
                    })?
                }
            };

            tx.commit()?;
            Ok(user)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_is_lowercased_and_dot_joined() {
        assert_eq!(email_for_name("Jane", "Doe"), "jane.doe@taskmanager.com");
        assert_eq!(
            email_for_name("Mary Ann", "VAN DER BERG"),
            "mary ann.van der berg@taskmanager.com"
        );
    }
}
