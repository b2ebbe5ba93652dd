use anyhow::{bail, Context};

use crate::models::ReservationStatus;

/// Allowed status transitions, consulted before every status write. The set
/// is configurable because the business has not settled whether operators may
/// reverse a completed or cancelled reservation; the default table forbids it.
#[derive(Debug, Clone)]
pub struct TransitionTable {
    allowed: Vec<(ReservationStatus, ReservationStatus)>,
}

impl Default for TransitionTable {
    fn default() -> Self {
        use ReservationStatus::*;
        Self {
            allowed: vec![
                (Pending, Confirmed),
                (Pending, Cancelled),
                (Confirmed, Cancelled),
                (Confirmed, Completed),
            ],
        }
    }
}

impl TransitionTable {
    /// Parse a table from its config form: a comma-separated list of
    /// `from>to` pairs, e.g. `pending>confirmed,pending>cancelled`.
    pub fn from_spec(spec: &str) -> anyhow::Result<Self> {
        let mut allowed = vec![];
        for pair in spec.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            let (from, to) = pair
                .split_once('>')
                .with_context(|| format!("invalid transition '{pair}', expected from>to"))?;
            let from = match ReservationStatus::try_parse(from.trim()) {
                Some(s) => s,
                None => bail!("unknown status '{}' in transition '{pair}'", from.trim()),
            };
            let to = match ReservationStatus::try_parse(to.trim()) {
                Some(s) => s,
                None => bail!("unknown status '{}' in transition '{pair}'", to.trim()),
            };
            allowed.push((from, to));
        }
        if allowed.is_empty() {
            bail!("transition table is empty");
        }
        Ok(Self { allowed })
    }

    pub fn is_allowed(&self, from: ReservationStatus, to: ReservationStatus) -> bool {
        self.allowed.contains(&(from, to))
    }
}
