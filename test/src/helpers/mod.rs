pub mod test_transform;

pub use packet_exchange::{deliver_all, Delivery};
pub use test_hub::{Envelope, HubState, TestHub};
pub use test_session::TestSession;
pub use test_transform::TestTransform;
