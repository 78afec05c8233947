//! Multipart/form-data assembly for the document upload endpoint.
//!
//! The form is built as one contiguous body with a unique per-request
//! boundary token and a closing boundary marker. Parts keep their insertion
//! order: the upload endpoint expects the binary file part followed by any
//! scalar fields.

use uuid::Uuid;

/// An in-progress multipart/form-data body.
#[derive(Debug, Clone)]
pub struct MultipartForm {
    boundary: String,
    data: Vec<u8>,
}

impl MultipartForm {
    /// Start a form with a fresh boundary token.
    #[must_use]
    pub fn new() -> Self {
        Self {
            boundary: format!("Boundary-{}", Uuid::new_v4()),
            data: Vec::new(),
        }
    }

    /// The Content-Type header value carrying this form's boundary.
    #[must_use]
    pub fn content_type(&self) -> String {
        format!("multipart/form-data; boundary={}", self.boundary)
    }

    /// Append a scalar field part.
    pub fn add_field(&mut self, name: &str, value: &str) {
        self.push_str(&format!("--{}\r\n", self.boundary));
        self.push_str(&format!(
            "Content-Disposition: form-data; name=\"{name}\"\r\n\r\n"
        ));
        self.push_str(&format!("{value}\r\n"));
    }

    /// Append the binary file part.
    pub fn add_file(&mut self, name: &str, filename: &str, mime_type: &str, bytes: &[u8]) {
        self.push_str(&format!("--{}\r\n", self.boundary));
        self.push_str(&format!(
            "Content-Disposition: form-data; name=\"{name}\"; filename=\"{filename}\"\r\n"
        ));
        self.push_str(&format!("Content-Type: {mime_type}\r\n\r\n"));
        self.data.extend_from_slice(bytes);
        self.push_str("\r\n");
    }

    /// Terminate the body with the closing boundary marker.
    #[must_use]
    pub fn finish(mut self) -> Vec<u8> {
        let closing = format!("--{}--\r\n", self.boundary);
        self.data.extend_from_slice(closing.as_bytes());
        self.data
    }

    fn push_str(&mut self, s: &str) {
        self.data.extend_from_slice(s.as_bytes());
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
    fn boundary_is_unique_per_form() {
        let a = MultipartForm::new();
        let b = MultipartForm::new();
        assert_ne!(a.content_type(), b.content_type());
        assert!(a.content_type().starts_with("multipart/form-data; boundary=Boundary-"));
    }

    #[test]
    fn body_contains_parts_in_insertion_order_and_closing_marker() {
        let mut form = MultipartForm::new();
        let boundary = form
            .content_type()
            .split("boundary=")
            .nth(1)
            .unwrap()
            .to_string();

        form.add_file("file", "notes.pdf", "application/pdf", b"%PDF-1.4");
        form.add_field("custom-instructions", "focus on chapter 2");
        let body = String::from_utf8(form.finish()).unwrap();

        let file_pos = body
            .find("Content-Disposition: form-data; name=\"file\"; filename=\"notes.pdf\"")
            .expect("file part present");
        let field_pos = body
            .find("Content-Disposition: form-data; name=\"custom-instructions\"")
            .expect("field part present");
        assert!(file_pos < field_pos, "file part must come first");

        assert!(body.contains("Content-Type: application/pdf\r\n\r\n%PDF-1.4\r\n"));
        assert!(body.contains("focus on chapter 2\r\n"));
        assert!(body.ends_with(&format!("--{boundary}--\r\n")));
    }

    #[test]
    fn field_part_has_blank_line_before_value() {
        let mut form = MultipartForm::new();
        form.add_field("key", "value");
        let body = String::from_utf8(form.finish()).unwrap();
        assert!(body.contains("name=\"key\"\r\n\r\nvalue\r\n"));
    }
}
