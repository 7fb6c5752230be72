pub mod group;
pub mod member;

pub use group::{GroupSummary, GroupType};
pub use member::{MemberSummary, PrincipalType};
