use serde::{Deserialize, Serialize};

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
)]
pub struct MemberId(i64);

impl MemberId {
    pub fn new(id: i64) -> Self {
        Self(id)
    }
}

impl AsRef<i64> for MemberId {
    fn as_ref(&self) -> &i64 {
        &self.0
    }
}

#[test]
fn test_ids_order_by_value() {
    assert!(MemberId::new(2) < MemberId::new(10));
    assert_eq!(*MemberId::new(7).as_ref(), 7);
}

#[test]
fn test_ids_serialize_as_numbers() {
    let id = MemberId::new(42);
    assert_eq!(serde_json::to_string(&id).unwrap(), "42");
    assert_eq!(serde_json::from_str::<MemberId>("42").unwrap(), id);
}
