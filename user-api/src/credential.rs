//! Authentication context attached to outgoing requests.

use crate::error::{Error, Result};
use derive_builder::Builder;
use serde::Deserialize;
use std::fmt;

/// A single named field of a [`Credential`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Claim {
    /// The `SESSDATA` session cookie.
    Session,
    /// The `bili_jct` cookie, echoed back as the CSRF token on state-changing requests.
    WriteToken,
    /// The `buvid3` device identifier.
    DeviceId,
    /// The `DedeUserID` cookie holding the numeric id of the logged-in user.
    UserId,
}

impl Claim {
    /// Cookie name under which the upstream expects this claim.
    pub fn cookie_name(self) -> &'static str {
        match self {
            Claim::Session => "SESSDATA",
            Claim::WriteToken => "bili_jct",
            Claim::DeviceId => "buvid3",
            Claim::UserId => "DedeUserID",
        }
    }
}

impl fmt::Display for Claim {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.cookie_name())
    }
}

/// The credential an actor performs operations with.
///
/// Every field is optional. The default value is the anonymous credential, which is enough for
/// all public endpoints. Operations that need a particular claim check for it with
/// [`Credential::require`] before anything is sent.
///
/// ```
/// use bilibili_user::Credential;
///
/// let credential = Credential::builder()
///     .sessdata("session")
///     .bili_jct("csrf")
///     .build()
///     .unwrap();
/// assert!(credential.has(bilibili_user::Claim::WriteToken));
/// ```
#[derive(Clone, Default, PartialEq, Eq, Builder, Deserialize)]
#[builder(default, setter(into, strip_option))]
pub struct Credential {
    #[serde(default, alias = "SESSDATA")]
    sessdata: Option<String>,
    #[serde(default)]
    bili_jct: Option<String>,
    #[serde(default)]
    buvid3: Option<String>,
    #[serde(default, alias = "DedeUserID")]
    dedeuserid: Option<String>,
}

impl Credential {
    pub fn builder() -> CredentialBuilder {
        CredentialBuilder::default()
    }

    /// The credential with no claims at all.
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Returns the value of `claim`, if present.
    pub fn get(&self, claim: Claim) -> Option<&str> {
        match claim {
            Claim::Session => self.sessdata.as_deref(),
            Claim::WriteToken => self.bili_jct.as_deref(),
            Claim::DeviceId => self.buvid3.as_deref(),
            Claim::UserId => self.dedeuserid.as_deref(),
        }
    }

    pub fn has(&self, claim: Claim) -> bool {
        self.get(claim).is_some()
    }

    /// Fails with [`Error::MissingCredential`] if `claim` is absent.
    pub fn require(&self, claim: Claim) -> Result<&str> {
        self.get(claim).ok_or(Error::MissingCredential(claim))
    }

    /// Checks `claims` in order and reports the first one that is absent.
    pub fn require_all(&self, claims: &[Claim]) -> Result<()> {
        for &claim in claims {
            self.require(claim)?;
        }
        Ok(())
    }

    pub fn is_anonymous(&self) -> bool {
        CLAIMS.iter().all(|&claim| !self.has(claim))
    }

    /// The present claims as `(cookie name, value)` pairs.
    pub fn cookies(&self) -> impl Iterator<Item = (&'static str, &str)> + '_ {
        CLAIMS
            .iter()
            .filter_map(|&claim| Some((claim.cookie_name(), self.get(claim)?)))
    }
}

const CLAIMS: [Claim; 4] = [
    Claim::Session,
    Claim::WriteToken,
    Claim::DeviceId,
    Claim::UserId,
];

// Claim values are secrets and must never end up in logs.
impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let present: Vec<_> = CLAIMS
            .iter()
            .filter(|&&claim| self.has(claim))
            .map(|claim| claim.cookie_name())
            .collect();
        f.debug_struct("Credential")
            .field("claims", &present)
            .finish()
    }
}
