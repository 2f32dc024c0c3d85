/// Object category derived from a detector class label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TargetType {
    /// Whole paper target
    Target,
    /// Aiming mark at the middle of a target
    Center,
    /// Bullet hole punched through a target
    BulletHole,
    /// Label that matches none of the known categories
    #[default]
    Invalid,
}

impl TargetType {
    /// Classify a detector label by substring, checked in the order
    /// center, bullet, target.
    pub fn from_class_name(class_name: &str) -> Self {
        if class_name.contains("center") {
            TargetType::Center
        } else if class_name.contains("bullet") {
            TargetType::BulletHole
        } else if class_name.contains("target") {
            TargetType::Target
        } else {
            TargetType::Invalid
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_class_name() {
        let classify = TargetType::from_class_name;
        assert_eq!(classify("center"), TargetType::Center);
        assert_eq!(classify("center_4"), TargetType::Center);
        assert_eq!(classify("bullet"), TargetType::BulletHole);
        assert_eq!(classify("bullet_hole"), TargetType::BulletHole);
        assert_eq!(classify("target"), TargetType::Target);
        assert_eq!(classify("person"), TargetType::Invalid);
    }

    #[test]
    fn test_center_wins_over_target() {
        let classify = TargetType::from_class_name;
        assert_eq!(classify("target_center"), TargetType::Center);
    }
}
