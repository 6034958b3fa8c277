use crate::model::{Resource, ResourceStatus};

/// Only ATP resources, or resources already under consideration somewhere,
/// are scored at all.
pub fn is_eligible(resource: &Resource) -> bool {
    resource.status == ResourceStatus::Atp || !resource.considerations.is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Consideration;

    #[test]
    fn atp_resources_are_eligible() {
        let resource = Resource {
            status: ResourceStatus::Atp,
            ..Resource::default()
        };
        assert!(is_eligible(&resource));
    }

    #[test]
    fn deployed_resources_need_a_consideration() {
        let mut resource = Resource {
            status: ResourceStatus::Deployed,
            ..Resource::default()
        };
        assert!(!is_eligible(&resource));

        resource.considerations.push(Consideration::default());
        assert!(is_eligible(&resource));
    }
}
