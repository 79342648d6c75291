use uuid::Uuid;

/// Incremental `multipart/form-data` body. The encoder is hand-rolled so
/// builders can produce a byte-exact body without pulling in a client-side
/// form abstraction.
#[derive(Debug, Clone)]
pub struct MultipartForm {
    boundary: String,
    bytes: Vec<u8>,
}

impl MultipartForm {
    pub fn new() -> Self {
        Self {
            boundary: format!("Boundary-{}", Uuid::new_v4()),
            bytes: Vec::new(),
        }
    }

    pub fn boundary(&self) -> &str {
        &self.boundary
    }

    pub fn content_type(&self) -> String {
        format!("multipart/form-data; boundary={}", self.boundary)
    }

    pub fn field(&mut self, name: &str, value: &str) -> &mut Self {
        self.bytes
            .extend_from_slice(format!("--{}\r\n", self.boundary).as_bytes());
        self.bytes.extend_from_slice(
            format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", name).as_bytes(),
        );
        self.bytes.extend_from_slice(value.as_bytes());
        self.bytes.extend_from_slice(b"\r\n");
        self
    }

    pub fn file(&mut self, name: &str, filename: &str, mime_type: &str, bytes: &[u8]) -> &mut Self {
        self.bytes
            .extend_from_slice(format!("--{}\r\n", self.boundary).as_bytes());
        self.bytes.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
                name, filename
            )
            .as_bytes(),
        );
        self.bytes
            .extend_from_slice(format!("Content-Type: {}\r\n\r\n", mime_type).as_bytes());
        self.bytes.extend_from_slice(bytes);
        self.bytes.extend_from_slice(b"\r\n");
        self
    }

    /// Appends the closing marker and returns `(boundary, body)`.
    pub fn finish(mut self) -> (String, Vec<u8>) {
        self.bytes
            .extend_from_slice(format!("--{}--\r\n", self.boundary).as_bytes());
        (self.boundary, self.bytes)
    }
}

impl Default for MultipartForm {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_fields_and_files_with_closing_marker() {
        let mut form = MultipartForm::new();
        form.field("model", "whisper-1");
        form.file("file", "audio.webm", "audio/webm", &[1, 2, 3]);
        let (boundary, bytes) = form.finish();

        let s = String::from_utf8_lossy(&bytes);
        assert!(s.contains(&format!("--{boundary}\r\n")));
        assert!(s.contains("Content-Disposition: form-data; name=\"model\"\r\n\r\nwhisper-1\r\n"));
        assert!(s.contains("name=\"file\"; filename=\"audio.webm\""));
        assert!(s.contains("Content-Type: audio/webm\r\n\r\n"));
        assert!(s.ends_with(&format!("--{boundary}--\r\n")));
    }

    #[test]
    fn boundaries_are_unique_per_form() {
        assert_ne!(MultipartForm::new().boundary, MultipartForm::new().boundary);
    }
}
