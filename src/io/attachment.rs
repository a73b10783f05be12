//! Reader listing attachment files

use crate::error::Result;
use crate::io::files::list_matching_files;
use crate::io::{FilePatterns, Reader, ResultDirectories};
use crate::model::AttachmentInfo;

pub struct AttachmentReader {
    directories: ResultDirectories,
    patterns: FilePatterns,
}

impl AttachmentReader {
    pub fn new(directories: ResultDirectories, patterns: FilePatterns) -> Self {
        AttachmentReader {
            directories,
            patterns,
        }
    }
}

impl Reader<AttachmentInfo> for AttachmentReader {
    fn read(&self) -> Result<Vec<AttachmentInfo>> {
        let mut attachments = Vec::new();

        for dir in self.directories.existing() {
            for path in list_matching_files(dir, &self.patterns.attachment)? {
                let size = path.metadata()?.len();
                let name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default();
                attachments.push(AttachmentInfo { name, path, size });
            }
        }

        Ok(attachments)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_read_attachments() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("1-attachment.txt"), "hello").unwrap();
        fs::write(temp.path().join("2-attachment"), "").unwrap();
        fs::write(temp.path().join("3-testsuite.xml"), "<x/>").unwrap();

        let reader = AttachmentReader::new(
            ResultDirectories::new(vec![temp.path()]),
            FilePatterns::standard(),
        );
        let attachments = reader.read().unwrap();

        assert_eq!(attachments.len(), 2);
        assert_eq!(attachments[0].name, "1-attachment.txt");
        assert_eq!(attachments[0].size, 5);
        assert_eq!(attachments[0].path, temp.path().join("1-attachment.txt"));
        assert_eq!(attachments[1].name, "2-attachment");
        assert_eq!(attachments[1].size, 0);
    }
}
