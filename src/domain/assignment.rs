use super::{Member, Username, ValidationError};

/// Field assignment applied by a bulk update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MemberAssignment {
    SetUsername(Username),
    SetAge(i32),
    AddAge(i32),
    MultiplyAge(i32),
}

impl MemberAssignment {
    /// The member as it would look after the assignment. Fails instead of
    /// wrapping when the new age does not fit in an `i32`.
    pub fn apply(&self, member: &Member) -> Result<Member, ValidationError> {
        let mut updated = member.clone();
        match self {
            Self::SetUsername(username) => {
                updated.username = Some(username.clone())
            }
            Self::SetAge(age) => updated.age = *age,
            Self::AddAge(delta) => {
                updated.age = member
                    .age
                    .checked_add(*delta)
                    .ok_or_else(|| age_out_of_range(member, self))?
            }
            Self::MultiplyAge(factor) => {
                updated.age = member
                    .age
                    .checked_mul(*factor)
                    .ok_or_else(|| age_out_of_range(member, self))?
            }
        }
        Ok(updated)
    }
}

fn age_out_of_range(
    member: &Member,
    assignment: &MemberAssignment,
) -> ValidationError {
    ValidationError::new(format!(
        "Age out of range for member {}: {} with {:?}",
        member.member_id.as_ref(),
        member.age,
        assignment
    ))
}
