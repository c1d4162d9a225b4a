use std::path::{Path, PathBuf};

use prakriti::{QuestionBank, QuestionSource, SourceError};

/// Where the server takes its questions from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum QuestionsConfig {
    /// The questionnaire compiled into the binary.
    #[default]
    Builtin,
    /// A JSON file shaped like the question endpoint's body.
    File(PathBuf),
}

impl QuestionsConfig {
    /// Load the bank once; it stays fixed for the lifetime of the process.
    pub fn load(&self) -> Result<QuestionBank, SourceError> {
        match self {
            Self::Builtin => prakriti::questions::builtin().load(),
            Self::File(path) => FileQuestions::new(path).load(),
        }
    }
}

/// Questions read from a JSON file.
#[derive(Debug, Clone)]
pub struct FileQuestions {
    path: PathBuf,
}

impl FileQuestions {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl QuestionSource for FileQuestions {
    fn load(&self) -> Result<QuestionBank, SourceError> {
        let json = std::fs::read_to_string(&self.path).map_err(|source| SourceError::Io {
            path: self.path.clone(),
            source,
        })?;
        QuestionBank::from_json(&json)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::*;

    fn questions_file(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn builtin_is_default() {
        let bank = QuestionsConfig::default().load().unwrap();
        assert_eq!(bank.len(), 10);
    }

    #[test]
    fn loads_file() {
        let file = questions_file(
            r#"{ "questions": [ { "question": "Sleep?", "options": ["light", "moderate", "deep"] } ] }"#,
        );
        let bank = QuestionsConfig::File(file.path().to_path_buf()).load().unwrap();
        assert_eq!(bank.len(), 1);
        assert_eq!(bank.get(0).unwrap().text(), "Sleep?");
    }

    #[test]
    fn file_errors() {
        let missing = FileQuestions::new("/definitely/not/here.json").load();
        assert!(matches!(missing, Err(SourceError::Io { .. })));

        let two_options =
            questions_file(r#"{ "questions": [ { "question": "Q", "options": ["a", "b"] } ] }"#);
        assert!(matches!(
            FileQuestions::new(two_options.path()).load(),
            Err(SourceError::Parse(_))
        ));

        let empty = questions_file(r#"{ "questions": [] }"#);
        assert!(matches!(
            FileQuestions::new(empty.path()).load(),
            Err(SourceError::Empty)
        ));
    }
}
