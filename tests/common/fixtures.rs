//! JSON fixtures shaped like the Flow tRPC API

use serde_json::{Value, json};

/// Wrap a procedure result in the tRPC response envelope
pub fn envelope(result: Value) -> Value {
    json!({
        "result": {
            "data": {
                "json": {
                    "result": result,
                    "status": 200,
                    "statusText": "OK"
                }
            }
        }
    })
}

/// Envelope holding one page of workflows
pub fn workflow_page(workflows: Vec<Value>, next_page_token: Option<&str>) -> Value {
    envelope(json!({
        "workflows": workflows,
        "nextPageToken": next_page_token
    }))
}

/// Envelope holding one page of projects
pub fn project_page(projects: Vec<Value>, next_page_token: Option<&str>) -> Value {
    envelope(json!({
        "projects": projects,
        "nextPageToken": next_page_token
    }))
}

/// Workflow record
pub fn workflow(id: &str, create_time: &str, steps: Vec<Value>) -> Value {
    json!({
        "workflowId": id,
        "createTime": create_time,
        "workflowSteps": steps
    })
}

/// Workflow step record
pub fn step(id: &str, generations: Vec<Value>) -> Value {
    json!({
        "workflowStepId": id,
        "toolInfo": {"toolName": "PINHOLE"},
        "mediaGenerations": generations
    })
}

/// Media generation with both a media key and a video URL
pub fn video_generation(media_key: &str, fife_uri: &str) -> Value {
    json!({
        "mediaGenerationId": {
            "mediaType": "MEDIA_TYPE_VIDEO",
            "projectId": "proj1",
            "mediaKey": media_key
        },
        "mediaData": {
            "videoData": {
                "fifeUri": fife_uri,
                "servingBaseUri": "https://video.example.com"
            }
        }
    })
}

/// Media generation whose identity block has no media key
pub fn generation_without_key(fife_uri: &str) -> Value {
    json!({
        "mediaGenerationId": {"mediaType": "MEDIA_TYPE_VIDEO"},
        "mediaData": {"videoData": {"fifeUri": fife_uri}}
    })
}

/// Media generation with a key but no video data
pub fn generation_without_url(media_key: &str) -> Value {
    json!({
        "mediaGenerationId": {"mediaKey": media_key},
        "mediaData": {}
    })
}

/// Expected `input` parameter of the first workflow page
pub fn first_page_input(project_id: &str, page_size: u32) -> String {
    format!(
        r#"{{"json":{{"pageSize":{page_size},"projectId":"{project_id}","toolName":"PINHOLE","cursor":null}},"meta":{{"values":{{"cursor":["undefined"]}}}}}}"#
    )
}

/// Expected `input` parameter of a later workflow page
pub fn next_page_input(project_id: &str, page_size: u32, encoded_cursor: &str) -> String {
    format!(
        r#"{{"json":{{"pageSize":{page_size},"projectId":"{project_id}","toolName":"PINHOLE","cursor":"{encoded_cursor}"}}}}"#
    )
}

/// Fake video payload, distinct per key
pub fn video_bytes(media_key: &str) -> Vec<u8> {
    format!("fake mp4 payload for {media_key}").into_bytes()
}
