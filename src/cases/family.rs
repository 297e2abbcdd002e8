use super::Case;

/// Derived family identity: two cases belong to the same family iff
/// their normalized full name and normalized phone number both match.
/// Never stored; recomputed wherever dedup is needed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FamilyKey {
    name: String,
    phone: String,
}

impl FamilyKey {
    pub fn of(case: &Case) -> Self {
        Self::from_parts(&case.full_name, &case.phone_number)
    }

    pub fn from_parts(full_name: &str, phone_number: &str) -> Self {
        Self {
            name: full_name.trim().to_lowercase(),
            phone: phone_number
                .chars()
                .filter(|c| !c.is_whitespace())
                .collect(),
        }
    }
}
