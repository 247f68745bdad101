use serde::{Deserialize, Serialize};
use std::{
    fmt::{Display, Formatter},
    str::FromStr,
};
use thiserror::Error;

#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Hash)]
pub enum VoteType {
    Upvote,
    Downvote,
}

#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Default, Hash, Error)]
#[error("Invalid vote type: {0:?}")]
pub struct InvalidVoteTypeError(pub String);

/// Body of a vote request. The vote type stays a plain string until it is parsed,
/// so unknown values are reported as a validation failure rather than a JSON error.
#[derive(Clone, Eq, PartialEq, Debug, Default, Hash, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteRequest {
    #[serde(default)]
    pub vote_type: String,
}

impl VoteType {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            VoteType::Upvote => "upvote",
            VoteType::Downvote => "downvote",
        }
    }
}

impl Display for VoteType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VoteType {
    type Err = InvalidVoteTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "upvote" => Ok(VoteType::Upvote),
            "downvote" => Ok(VoteType::Downvote),
            other => Err(InvalidVoteTypeError(other.to_owned())),
        }
    }
}

impl TryFrom<&VoteRequest> for VoteType {
    type Error = InvalidVoteTypeError;

    fn try_from(value: &VoteRequest) -> Result<Self, Self::Error> {
        value.vote_type.parse()
    }
}
