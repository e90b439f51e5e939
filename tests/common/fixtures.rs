use drive_gcs_sync::drive_service::SourceNode;

pub const TEST_BUCKET: &str = "test-bucket";

pub fn folder(id: &str, name: &str) -> SourceNode {
    SourceNode::folder(id, name)
}

pub fn file(id: &str, name: &str) -> SourceNode {
    SourceNode::file(id, name)
}

pub fn typed_file(id: &str, name: &str, mime_type: &str) -> SourceNode {
    SourceNode::typed_file(id, name, mime_type)
}
