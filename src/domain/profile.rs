// Solder profile domain model
use serde_json::{Map, Value};

const MANUAL_PROFILE_NAME: &str = "Manual";

#[derive(Debug, Clone, PartialEq)]
pub struct Profile {
    pub name: String,
    /// Ramp/soak parameters as sent by the backend, never interpreted here
    pub params: Map<String, Value>,
}

impl Profile {
    pub fn new(name: String, params: Map<String, Value>) -> Self {
        Self { name, params }
    }

    #[cfg(test)]
    pub fn named(name: &str) -> Self {
        Self::new(name.to_string(), Map::new())
    }

    pub fn is_manual(&self) -> bool {
        self.name.eq_ignore_ascii_case(MANUAL_PROFILE_NAME)
    }
}

/// Ordered list of profiles, loaded once per console session.
#[derive(Debug, Clone, Default)]
pub struct ProfileDirectory {
    profiles: Vec<Profile>,
}

impl ProfileDirectory {
    pub fn new(profiles: Vec<Profile>) -> Self {
        Self { profiles }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn get(&self, index: usize) -> Option<&Profile> {
        self.profiles.get(index)
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Profile> {
        self.profiles.iter()
    }

    /// Row the backend itself uses for manual mode, if it lists one
    pub fn manual_row(&self) -> Option<usize> {
        self.profiles.iter().position(Profile::is_manual)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn firmware_directory() -> ProfileDirectory {
        ProfileDirectory::new(vec![
            Profile::named("Manual"),
            Profile::named("SAC305"),
            Profile::named("Sn63/Pb37"),
        ])
    }

    #[test]
    fn test_manual_row() {
        assert_eq!(firmware_directory().manual_row(), Some(0));

        let without_manual =
            ProfileDirectory::new(vec![Profile::named("SAC305"), Profile::named("Sn63/Pb37")]);
        assert_eq!(without_manual.manual_row(), None);

        let lowercase = ProfileDirectory::new(vec![Profile::named("SAC305"), Profile::named("manual")]);
        assert_eq!(lowercase.manual_row(), Some(1));
    }

    #[test]
    fn test_lookup_keeps_order() {
        let directory = firmware_directory();
        assert_eq!(directory.len(), 3);
        assert_eq!(directory.get(1).map(|p| p.name.as_str()), Some("SAC305"));
        assert!(directory.get(3).is_none());

        let names: Vec<&str> = directory.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Manual", "SAC305", "Sn63/Pb37"]);
    }

    #[test]
    fn test_empty_directory() {
        let directory = ProfileDirectory::empty();
        assert!(directory.is_empty());
        assert_eq!(directory.manual_row(), None);
    }
}
