//! API endpoints and how their URLs are formed.

use url::Url;

use crate::{ErrorKind, Result};

/// Default hostname of the Path of Exile API
pub const DEFAULT_HOST: &str = "api.pathofexile.com";

/// Default hostname of poe.ninja, which tracks the latest stash change id
pub const DEFAULT_NINJA_HOST: &str = "poe.ninja";

/// Path of the public stash tab endpoint, the only rate-restricted one
pub const STASH_PATH: &str = "/public-stash-tabs";

/// Path of the poe.ninja statistics endpoint
pub const NINJA_STATS_PATH: &str = "/api/Data/GetStats";

/// Which of the two configured hosts serves an endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostKind {
    /// The Path of Exile API host
    Api,
    /// The poe.ninja host
    Ninja,
}

/// A resource offered by the API.
///
/// Endpoints only know their path; the client supplies scheme and host.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Endpoint {
    /// All current leagues
    Leagues,
    /// A single league
    League {
        /// League name, e.g. `Standard`
        id: String,
    },
    /// All league modifiers
    LeagueRules,
    /// A single league modifier
    LeagueRule {
        /// Rule id, e.g. `TurboMonsters`
        id: String,
    },
    /// The ladder of a league
    Ladder {
        /// League name
        id: String,
    },
    /// Scheduled PvP matches
    PvpMatches,
    /// One page of the public stash tab river
    Stashes {
        /// Where to resume the river; the first page when `None`
        change_id: Option<String>,
    },
    /// poe.ninja statistics, which carry the most recent stash change id
    LatestStashId,
}

impl Endpoint {
    fn segments(&self) -> Vec<&str> {
        match self {
            Self::Leagues => vec!["leagues"],
            Self::League { id } => vec!["leagues", id.as_str()],
            Self::LeagueRules => vec!["league-rules"],
            Self::LeagueRule { id } => vec!["league-rules", id.as_str()],
            Self::Ladder { id } => vec!["ladders", id.as_str()],
            Self::PvpMatches => vec!["pvp-matches"],
            Self::Stashes { .. } => vec!["public-stash-tabs"],
            Self::LatestStashId => vec!["api", "Data", "GetStats"],
        }
    }

    /// Unencoded request path, for display and logging
    #[must_use]
    pub fn path(&self) -> String {
        format!("/{}", self.segments().join("/"))
    }

    /// The host this endpoint lives on
    #[must_use]
    pub const fn host_kind(&self) -> HostKind {
        match self {
            Self::LatestStashId => HostKind::Ninja,
            _ => HostKind::Api,
        }
    }

    /// Returns `true` for the endpoint subject to the stricter rate limit
    #[must_use]
    pub const fn is_restricted(&self) -> bool {
        matches!(self, Self::Stashes { .. })
    }

    /// Build the full request URL against `host`.
    ///
    /// Path segments and the stash change id are percent-encoded.
    ///
    /// # Errors
    ///
    /// Returns an error if `host` does not form a valid base URL.
    pub fn url(&self, host: &str, use_ssl: bool) -> Result<Url> {
        let base = format!("{}://{host}", if use_ssl { "https" } else { "http" });
        let mut url = Url::parse(&base).map_err(|e| ErrorKind::ParseUrl(e, base.clone()))?;

        url.path_segments_mut()
            .map_err(|()| ErrorKind::InvalidHost(host.to_string()))?
            .pop_if_empty()
            .extend(self.segments());

        if let Self::Stashes {
            change_id: Some(change_id),
        } = self
        {
            url.query_pairs_mut().append_pair("id", change_id);
        }

        Ok(url)
    }
}
