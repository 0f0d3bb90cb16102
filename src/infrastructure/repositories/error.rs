use crate::domain::errors::DomainError;

pub(super) const CNT_NOTIFICATION_PAIR: &str = "ux_notifications_sent_subscriber_article";

pub fn map_sqlx(err: sqlx::Error) -> DomainError {
    match &err {
        sqlx::Error::Database(db_err) => {
            if let Some(constraint) = db_err.constraint() {
                return match constraint {
                    CNT_NOTIFICATION_PAIR => {
                        DomainError::Conflict("notification already recorded".into())
                    }
                    other => {
                        DomainError::Persistence(format!("database constraint violation: {other}"))
                    }
                };
            }

            if let Some(code) = db_err.code() {
                match code.as_ref() {
                    "23505" => {
                        return DomainError::Conflict("unique constraint violated".into());
                    }
                    "23503" => {
                        return DomainError::NotFound("referenced record not found".into());
                    }
                    _ => {}
                }
            }

            DomainError::Persistence(db_err.message().to_string())
        }
        _ => DomainError::Persistence(err.to_string()),
    }
}

/// Builds an `sqlx::Error::Database` carrying the given SQLSTATE code and
/// optional constraint name, for exercising the mapping without a live
/// database.
#[cfg(test)]
pub(super) fn stub_database_error(code: &str, constraint: Option<&str>) -> sqlx::Error {
    sqlx::Error::Database(Box::new(StubDatabaseError {
        code: code.to_string(),
        constraint: constraint.map(str::to_string),
    }))
}

#[cfg(test)]
#[derive(Debug)]
struct StubDatabaseError {
    code: String,
    constraint: Option<String>,
}

#[cfg(test)]
impl std::fmt::Display for StubDatabaseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "database error {}", self.code)
    }
}

#[cfg(test)]
impl std::error::Error for StubDatabaseError {}

#[cfg(test)]
impl sqlx::error::DatabaseError for StubDatabaseError {
    fn message(&self) -> &str {
        "stub database error"
    }

    fn code(&self) -> Option<std::borrow::Cow<'_, str>> {
        Some(std::borrow::Cow::Borrowed(&self.code))
    }

    fn constraint(&self) -> Option<&str> {
        self.constraint.as_deref()
    }

    fn kind(&self) -> sqlx::error::ErrorKind {
        match self.code.as_str() {
            "23505" => sqlx::error::ErrorKind::UniqueViolation,
            "23503" => sqlx::error::ErrorKind::ForeignKeyViolation,
            _ => sqlx::error::ErrorKind::Other,
        }
    }

    fn as_error(&self) -> &(dyn std::error::Error + Send + Sync + 'static) {
        self
    }

    fn as_error_mut(&mut self) -> &mut (dyn std::error::Error + Send + Sync + 'static) {
        self
    }

    fn into_error(self: Box<Self>) -> Box<dyn std::error::Error + Send + Sync + 'static> {
        self
    }
}
