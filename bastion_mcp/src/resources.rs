//! Resource handling for the Bastion MCP server.
//!
//! The job descriptions are published both as a tool and as the
//! `bastion://job-descriptions` resource.

use rmcp::model::{AnnotateAble, RawResource, Resource};

use bastion_core::tools::job_descriptions::JOB_DESCRIPTIONS;

/// The URI scheme for Bastion resources.
pub const SCHEME: &str = "bastion";

/// Name of the job descriptions resource.
pub const JOB_DESCRIPTIONS_NAME: &str = "job-descriptions";

/// Creates the URI for a named resource.
pub fn resource_uri(name: &str) -> String {
    format!("{}://{}", SCHEME, name)
}

/// All resources the server publishes.
pub fn list() -> Vec<Resource> {
    vec![
        RawResource {
            uri: resource_uri(JOB_DESCRIPTIONS_NAME),
            name: JOB_DESCRIPTIONS_NAME.to_string(),
            title: Some("Job descriptions".to_string()),
            description: Some(
                "Roles and accounts of the organization, for reviewing access.".to_string(),
            ),
            mime_type: Some("text/markdown".to_string()),
            size: None,
            icons: None,
            meta: None,
        }
        .no_annotation(),
    ]
}

/// Returns the text behind a resource URI.
pub fn read(uri: &str) -> Option<&'static str> {
    let name = uri.strip_prefix(SCHEME)?.strip_prefix("://")?;
    match name {
        JOB_DESCRIPTIONS_NAME => Some(JOB_DESCRIPTIONS),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resource_uri() {
        assert_eq!(
            resource_uri(JOB_DESCRIPTIONS_NAME),
            "bastion://job-descriptions"
        );
    }

    #[test]
    fn test_read_known_resource() {
        let text = read("bastion://job-descriptions").unwrap();
        assert!(text.contains("Help Desk Technician"));
    }

    #[test]
    fn test_read_unknown_resource() {
        assert_eq!(read("bastion://payroll"), None);
        assert_eq!(read("other://job-descriptions"), None);
        assert_eq!(read("job-descriptions"), None);
    }

    #[test]
    fn test_list_matches_read() {
        for resource in list() {
            assert!(read(&resource.uri).is_some());
        }
    }
}
