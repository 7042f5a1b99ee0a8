//! Scene/render metadata reported by the server.

use crate::stream::Stream;
use crate::util::Result;

/// Placeholder for string fields the server left empty.
const NOT_SET: &str = "not set";

/// General information about the scene being rendered: name, where the
/// final image goes, and the configured sample count.
///
/// `sample_count` is the only field the client may edit and send back to
/// the server (see `Session::send_render_info`).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderInfo {
    pub scene_name: String,
    pub output_filepath: String,
    pub extension: String,
    pub sample_count: i32,
}

impl Default for RenderInfo {
    fn default() -> Self {
        Self {
            scene_name: NOT_SET.to_string(),
            output_filepath: NOT_SET.to_string(),
            extension: NOT_SET.to_string(),
            sample_count: 0,
        }
    }
}

impl RenderInfo {
    /// Read one render-info payload from the stream.
    pub fn deserialize<S: Stream + ?Sized>(stream: &mut S) -> Result<Self> {
        Ok(Self {
            scene_name: valid_or_not_set(stream.read_string()?),
            output_filepath: valid_or_not_set(stream.read_string()?),
            extension: valid_or_not_set(stream.read_string()?),
            sample_count: stream.read_i32()?,
        })
    }
}

fn valid_or_not_set(s: String) -> String {
    if s.is_empty() {
        NOT_SET.to_string()
    } else {
        s
    }
}
