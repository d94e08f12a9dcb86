//! Relay audiences and peer roles

use crate::{Error, Result, Value};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Audience selector of a relay envelope
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RelayTarget {
    /// Every connected peer, the sender included
    All = 0,
    /// Every connected performer
    Performers = 1,
    /// Every connected audience member
    Audience = 2,
    /// Every connected peer except the sender
    AllButMe = 3,
}

impl RelayTarget {
    /// Decode the wire integer
    pub fn from_wire(raw: i32) -> Result<Self> {
        match raw {
            0 => Ok(RelayTarget::All),
            1 => Ok(RelayTarget::Performers),
            2 => Ok(RelayTarget::Audience),
            3 => Ok(RelayTarget::AllButMe),
            other => Err(Error::InvalidTarget(other)),
        }
    }

    /// Wire integer for this target
    pub fn to_wire(self) -> i32 {
        self as i32
    }
}

impl From<RelayTarget> for Value {
    fn from(target: RelayTarget) -> Self {
        Value::Int(target.to_wire())
    }
}

impl fmt::Display for RelayTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RelayTarget::All => "all",
            RelayTarget::Performers => "performers",
            RelayTarget::Audience => "audience",
            RelayTarget::AllButMe => "all-but-me",
        };
        write!(f, "{}", name)
    }
}

/// Role a peer plays in the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Role {
    #[default]
    Performer = 0,
    Audience = 1,
}

impl Role {
    /// Decode the wire integer
    pub fn from_wire(raw: i32) -> Result<Self> {
        match raw {
            0 => Ok(Role::Performer),
            1 => Ok(Role::Audience),
            other => Err(Error::InvalidRole(other)),
        }
    }

    pub fn to_wire(self) -> i32 {
        self as i32
    }
}

impl From<Role> for Value {
    fn from(role: Role) -> Self {
        Value::Int(role.to_wire())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_wire() {
        for target in [
            RelayTarget::All,
            RelayTarget::Performers,
            RelayTarget::Audience,
            RelayTarget::AllButMe,
        ] {
            assert_eq!(RelayTarget::from_wire(target.to_wire()), Ok(target));
        }
        assert_eq!(RelayTarget::AllButMe.to_wire(), 3);
        assert_eq!(RelayTarget::from_wire(9), Err(Error::InvalidTarget(9)));
    }

    #[test]
    fn test_role_wire() {
        assert_eq!(Role::from_wire(0), Ok(Role::Performer));
        assert_eq!(Role::from_wire(1), Ok(Role::Audience));
        assert_eq!(Role::from_wire(-1), Err(Error::InvalidRole(-1)));
        assert_eq!(Role::default(), Role::Performer);
    }
}
