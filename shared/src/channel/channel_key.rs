use crate::types::{BehaviourId, ObjectId};

/// Identifies the replicated transform of one behaviour on one object, so
/// several replicated objects never share a message channel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ChannelKey {
    pub object_id: ObjectId,
    pub behaviour_id: BehaviourId,
}

/// The kind of message carried by an inbound channel name
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MessageRoute {
    Snapshot,
    OwnerAuthority,
}

/// Channel names derived from a `ChannelKey`, built once per channel
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChannelNames {
    pub snapshot: String,
    pub owner_authority: String,
}

impl ChannelKey {
    pub fn new(object_id: ObjectId, behaviour_id: BehaviourId) -> Self {
        Self {
            object_id,
            behaviour_id,
        }
    }

    pub fn names(&self) -> ChannelNames {
        let snapshot = format!("transform/{}/{}", self.object_id, self.behaviour_id);
        let owner_authority = format!("{}/owner_authority", snapshot);
        ChannelNames {
            snapshot,
            owner_authority,
        }
    }
}

impl ChannelNames {
    pub fn route(&self, channel: &str) -> Option<MessageRoute> {
        if channel == self.snapshot {
            Some(MessageRoute::Snapshot)
        } else if channel == self.owner_authority {
            Some(MessageRoute::OwnerAuthority)
        } else {
            None
        }
    }
}
