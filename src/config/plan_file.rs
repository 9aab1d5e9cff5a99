//! Plan file parsing
//!
//! Reads the XML document describing backup plans. The root element holds
//! any number of plan elements (the tag name is not significant):
//!
//! ```xml
//! <backups>
//!     <backup retain="5" retain_type="number">
//!         <file>/home/me/notes.txt</file>
//!         <directory save_as="project">/home/me/src/project</directory>
//!         <location>/mnt/backup/daily</location>
//!     </backup>
//! </backups>
//! ```
//!
//! Any problem with the document is fatal for the run: no partial plan is
//! ever produced.

use std::fs;
use std::path::{Path, PathBuf};

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::error::{BackupError, BackupResult};
use crate::models::{BackupPlan, RetentionKind, TrackedDirectory};

/// Read and parse the plan file at `path`
pub fn load_plans(path: &Path) -> BackupResult<Vec<BackupPlan>> {
    if !path.exists() {
        return Err(BackupError::Config(format!(
            "Plan file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        BackupError::Config(format!("Failed to read plan file {}: {}", path.display(), e))
    })?;

    let plans = parse_plans(&contents)?;
    tracing::debug!(path = %path.display(), plans = plans.len(), "loaded plan file");
    Ok(plans)
}

/// Parse a plan document
pub fn parse_plans(xml: &str) -> BackupResult<Vec<BackupPlan>> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut plans = Vec::new();
    let mut depth = 0usize;
    let mut seen_root = false;
    let mut plan: Option<PlanBuilder> = None;
    let mut field: Option<Field> = None;

    loop {
        let event = match reader.read_event() {
            Ok(event) => event,
            Err(e) => {
                return Err(BackupError::Xml(format!(
                    "Malformed plan file at byte {}: {}",
                    reader.buffer_position(),
                    e
                )))
            }
        };

        match event {
            Event::Start(e) => {
                depth += 1;
                match depth {
                    1 => seen_root = true,
                    2 => plan = Some(PlanBuilder::from_element(&e)?),
                    3 => field = Field::from_element(&e)?,
                    _ => {}
                }
            }
            Event::Empty(e) => match depth {
                0 => seen_root = true,
                1 => plans.push(PlanBuilder::from_element(&e)?.build()?),
                2 => {
                    if let (Some(empty), Some(current)) = (Field::from_element(&e)?, plan.as_mut()) {
                        current.apply(empty)?;
                    }
                }
                _ => {}
            },
            Event::Text(text) if depth == 3 => {
                if let Some(current) = field.as_mut() {
                    current.text.push_str(&text.unescape()?);
                }
            }
            Event::CData(data) if depth == 3 => {
                if let Some(current) = field.as_mut() {
                    current
                        .text
                        .push_str(&String::from_utf8_lossy(&data.into_inner()));
                }
            }
            Event::End(_) => {
                match depth {
                    2 => {
                        if let Some(finished) = plan.take() {
                            plans.push(finished.build()?);
                        }
                    }
                    3 => {
                        if let (Some(finished), Some(current)) = (field.take(), plan.as_mut()) {
                            current.apply(finished)?;
                        }
                    }
                    _ => {}
                }
                depth = depth.saturating_sub(1);
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !seen_root {
        return Err(BackupError::Xml("Plan file has no root element".into()));
    }

    Ok(plans)
}

fn tag_name(element: &BytesStart) -> String {
    String::from_utf8_lossy(element.name().as_ref()).to_string()
}

/// A plan element being read
struct PlanBuilder {
    tag: String,
    retain: u32,
    kind: RetentionKind,
    location: Option<PathBuf>,
    files: Vec<PathBuf>,
    directories: Vec<TrackedDirectory>,
}

impl PlanBuilder {
    fn from_element(element: &BytesStart) -> BackupResult<Self> {
        let tag = tag_name(element);
        let mut retain = None;
        let mut kind = None;

        for attr in element.attributes() {
            let attr = attr
                .map_err(|e| BackupError::Xml(format!("Invalid attribute on <{}>: {}", tag, e)))?;
            let value = attr.unescape_value()?;

            match attr.key.as_ref() {
                b"retain" => {
                    let parsed = value.trim().parse::<u32>().map_err(|_| {
                        BackupError::Xml(format!("<{}> has invalid retain value '{}'", tag, value))
                    })?;
                    retain = Some(parsed);
                }
                b"retain_type" => {
                    let parsed = RetentionKind::parse(&value).ok_or_else(|| {
                        BackupError::Xml(format!("<{}> has unknown retain_type '{}'", tag, value))
                    })?;
                    kind = Some(parsed);
                }
                _ => {}
            }
        }

        let retain = retain
            .ok_or_else(|| BackupError::Xml(format!("<{}> is missing the retain attribute", tag)))?;
        let kind = kind.ok_or_else(|| {
            BackupError::Xml(format!("<{}> is missing the retain_type attribute", tag))
        })?;

        Ok(Self {
            tag,
            retain,
            kind,
            location: None,
            files: Vec::new(),
            directories: Vec::new(),
        })
    }

    fn apply(&mut self, field: Field) -> BackupResult<()> {
        let text = field.text.trim();
        if text.is_empty() {
            return Err(BackupError::Validation(format!(
                "Empty <{}> in <{}>",
                field.kind.tag(),
                self.tag
            )));
        }

        match field.kind {
            FieldKind::File => self.files.push(PathBuf::from(text)),
            FieldKind::Directory { save_as } => self
                .directories
                .push(TrackedDirectory::new(text, save_as.as_deref())),
            FieldKind::Location => self.location = Some(PathBuf::from(text)),
        }

        Ok(())
    }

    fn build(self) -> BackupResult<BackupPlan> {
        let destination = self.location.ok_or_else(|| {
            BackupError::Validation(format!("<{}> has no <location>", self.tag))
        })?;

        let plan = BackupPlan {
            retention_kind: self.kind,
            retention_threshold: self.retain,
            destination,
            tracked_files: self.files,
            tracked_directories: self.directories,
        };
        plan.validate()?;

        Ok(plan)
    }
}

enum FieldKind {
    File,
    Directory { save_as: Option<String> },
    Location,
}

impl FieldKind {
    fn tag(&self) -> &'static str {
        match self {
            Self::File => "file",
            Self::Directory { .. } => "directory",
            Self::Location => "location",
        }
    }
}

/// A child element of a plan being read
struct Field {
    kind: FieldKind,
    text: String,
}

impl Field {
    /// Recognize a plan child element; unknown elements are skipped
    fn from_element(element: &BytesStart) -> BackupResult<Option<Self>> {
        let kind = match element.name().as_ref() {
            b"file" => FieldKind::File,
            b"location" => FieldKind::Location,
            b"directory" => {
                let save_as = element
                    .try_get_attribute("save_as")
                    .map_err(|e| BackupError::Xml(format!("Invalid attribute on <directory>: {}", e)))?
                    .map(|attr| attr.unescape_value().map(|v| v.to_string()))
                    .transpose()?;
                FieldKind::Directory { save_as }
            }
            _ => {
                tracing::debug!(element = %tag_name(element), "ignoring unknown plan element");
                return Ok(None);
            }
        };

        Ok(Some(Self {
            kind,
            text: String::new(),
        }))
    }
}
