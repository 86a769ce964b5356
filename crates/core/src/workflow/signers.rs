//! Signer assembly from parallel session sequences
//!
//! Hosts supply signer details as positional lists: the n-th email pairs
//! with the n-th first name, last name, external flag and access code. A
//! single string counts as a one-element list.
//!
//! When exactly one non-empty email is present the envelope is in
//! single-signer mode. Only that mode receives anchors collected from host
//! notes, because there is no way to tell which signer a note belongs to
//! otherwise.

use truesign_domain::validation::non_empty_entries;
use truesign_domain::{AccessCode, Anchor, Signer, SignerDto};

use super::session::{keys, SessionStore};

/// Positional signer details read from the session
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignerInputs {
    pub emails: Vec<String>,
    pub first_names: Vec<String>,
    pub last_names: Vec<String>,
    pub external: Vec<bool>,
    pub code_descriptions: Vec<String>,
    pub code_values: Vec<String>,
}

impl SignerInputs {
    pub fn from_session(session: &dyn SessionStore) -> Self {
        Self {
            emails: session.list(keys::SIGNER_EMAIL),
            first_names: session.list(keys::FIRST_NAME),
            last_names: session.list(keys::LAST_NAME),
            external: session.flags(keys::EXTERNAL),
            code_descriptions: session.list(keys::CODE_DESCRIPTION),
            code_values: session.list(keys::CODE_VALUE),
        }
    }

    pub fn is_single_signer(&self) -> bool {
        non_empty_entries(&self.emails).len() == 1
    }

    /// Build the signers in email order
    ///
    /// `anchors` go to the sole signer in single-signer mode and are
    /// ignored otherwise. No email yields no signers, which is how design
    /// mode hands signer selection to the designers.
    pub fn assemble(&self, anchors: Vec<Anchor>) -> Vec<Signer> {
        let positions: Vec<usize> = self
            .emails
            .iter()
            .enumerate()
            .filter(|(_, email)| !email.trim().is_empty())
            .map(|(index, _)| index)
            .collect();

        match positions.as_slice() {
            [] => Vec::new(),
            [only] => vec![self.signer_at(*only).with_anchors(anchors)],
            many => many.iter().map(|&index| self.signer_at(index)).collect(),
        }
    }

    fn signer_at(&self, index: usize) -> Signer {
        let email = self.emails[index].trim();
        let first_name = entry(&self.first_names, index);
        let last_name = entry(&self.last_names, index);

        if !self.external.get(index).copied().unwrap_or(false) {
            return Signer {
                first_name: first_name.to_string(),
                last_name: last_name.to_string(),
                ..Signer::internal(email)
            };
        }

        let description = entry(&self.code_descriptions, index);
        let value = entry(&self.code_values, index);
        let code = (!description.is_empty() && !value.is_empty())
            .then(|| AccessCode::new(description, value));
        Signer::external(&SignerDto::new(email, first_name, last_name), code)
    }
}

fn entry(values: &[String], index: usize) -> &str {
    values.get(index).map_or("", |value| value.trim())
}
