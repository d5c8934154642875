//! Line-oriented geometry file parser.
//!
//! # Format
//!
//! One directive per line, identified by a literal prefix at the start of the
//! line:
//!
//! | Prefix | Payload | Action |
//! |--------|---------|--------|
//! | `v `   | three decimals | append a position |
//! | `vt `  | two decimals | append a texture coordinate |
//! | `vn `  | three decimals | append a normal (normalized) |
//! | `f `   | `v/vt/vn` triples separated by whitespace | append a face |
//!
//! Anything else is ignored.
//!
//! # Error Classes
//!
//! - A malformed numeric payload is a data-quality problem: the directive gets
//!   a default value, a warning naming `file:line` is logged, and parsing goes
//!   on.
//! - A broken face (bad triple, index outside the pools, fewer than three
//!   corners) is structural: the whole load fails and nothing is returned.
//! - I/O and allocation failures abort the load.
//!
//! # Face Indices
//!
//! Indices are 1-based. A negative index `n` counts back from the end of the
//! pool as it stands when the face line is read: it resolves to
//! `pool_size + n + 1`. Pool sizes are running totals, so a face can only
//! reference geometry declared above it.

mod pattern;

pub use pattern::{DecimalPattern, FieldPatterns, VectorPattern};

use std::collections::TryReserveError;
use std::fmt;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::math::vec2::Vec2;
use crate::math::vec3::Vec3;
use crate::model::{Face, Model};

const VERTEX_PREFIX: &str = "v ";
const TEX_COORD_PREFIX: &str = "vt ";
const NORMAL_PREFIX: &str = "vn ";
const FACE_PREFIX: &str = "f ";

/// Substituted for a malformed `v` line.
pub const DEFAULT_VERTEX: Vec3 = Vec3::ZERO;
/// Substituted for a malformed `vt` line.
pub const DEFAULT_TEX_COORD: Vec2 = Vec2::ZERO;
/// Substituted for a malformed or zero-length `vn` line.
pub const DEFAULT_NORMAL: Vec3 = Vec3::DOWN;

const MIN_FACE_CORNERS: usize = 3;

/// Errors that abort a model load.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("model file not found: {}", path.display())]
    FileNotFound { path: PathBuf },

    #[error("failed to read {}: {source}", path.display())]
    Io { path: PathBuf, source: io::Error },

    #[error("{file}:{line}: malformed face: {fault}")]
    MalformedFace {
        file: String,
        line: usize,
        fault: FaceFault,
    },

    #[error("out of memory while loading {file}")]
    OutOfMemory { file: String },
}

/// Which pool a face index refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pool {
    Vertex,
    TexCoord,
    Normal,
}

impl fmt::Display for Pool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Pool::Vertex => write!(f, "vertex"),
            Pool::TexCoord => write!(f, "texture coordinate"),
            Pool::Normal => write!(f, "normal"),
        }
    }
}

/// Why a face line was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FaceFault {
    #[error("expected a `v/vt/vn` triple, found `{0}`")]
    BadTriple(String),

    #[error("`{0}` is not an integer index")]
    BadIndex(String),

    #[error("{pool} index {index} is out of range ({pool_size} declared so far)")]
    IndexOutOfRange {
        pool: Pool,
        index: i64,
        pool_size: usize,
    },

    #[error("face has {0} corners, at least 3 are required")]
    TooFewCorners(usize),

    #[error("per-corner index lists have different lengths")]
    MismatchedLists,
}

/// Position of the line being parsed, for diagnostics.
#[derive(Debug, Clone, Copy)]
pub struct LineCursor<'a> {
    pub text: &'a str,
    pub byte_len: usize,
    pub source: &'a str,
    /// 1-based.
    pub number: usize,
}

impl fmt::Display for LineCursor<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.source, self.number)
    }
}

/// Running pool sizes, used to resolve face indices.
#[derive(Debug, Clone, Copy, Default)]
struct PoolSizes {
    vertices: usize,
    tex_coords: usize,
    normals: usize,
}

/// Load a model from a file.
///
/// # Errors
/// - [`LoadError::FileNotFound`] if `path` does not exist
/// - [`LoadError::Io`] if the file cannot be opened or read
/// - [`LoadError::MalformedFace`] if a face line is structurally broken
/// - [`LoadError::OutOfMemory`] if a pool cannot grow
pub fn load<P: AsRef<Path>>(path: P) -> Result<Model, LoadError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| match source.kind() {
        io::ErrorKind::NotFound => LoadError::FileNotFound {
            path: path.to_path_buf(),
        },
        _ => LoadError::Io {
            path: path.to_path_buf(),
            source,
        },
    })?;

    parse(BufReader::new(file), &path.display().to_string())
}

/// Parse a model from a buffered reader.
pub fn parse<R: BufRead>(reader: R, source_name: &str) -> Result<Model, LoadError> {
    let patterns = FieldPatterns::new();
    ModelParser::new(&patterns, source_name).parse(reader)
}

/// Single-use parser state. Owns the pools until the parse succeeds; on any
/// error they are dropped with the parser.
pub struct ModelParser<'p> {
    patterns: &'p FieldPatterns,
    source: &'p str,
    vertices: Vec<Vec3>,
    tex_coords: Vec<Vec2>,
    normals: Vec<Vec3>,
    faces: Vec<Face>,
}

impl<'p> ModelParser<'p> {
    pub fn new(patterns: &'p FieldPatterns, source: &'p str) -> Self {
        Self {
            patterns,
            source,
            vertices: Vec::new(),
            tex_coords: Vec::new(),
            normals: Vec::new(),
            faces: Vec::new(),
        }
    }

    pub fn parse<R: BufRead>(mut self, mut reader: R) -> Result<Model, LoadError> {
        let mut raw = Vec::new();
        let mut number = 0;

        loop {
            raw.clear();
            let read = reader.read_until(b'\n', &mut raw).map_err(|source| LoadError::Io {
                path: PathBuf::from(self.source),
                source,
            })?;
            if read == 0 {
                break;
            }
            number += 1;

            while matches!(raw.last(), Some(b'\n' | b'\r')) {
                raw.pop();
            }
            let text = String::from_utf8_lossy(&raw);
            let line = LineCursor {
                text: &text,
                byte_len: raw.len(),
                source: self.source,
                number,
            };
            self.parse_line(&line)?;
        }

        self.finish()
    }

    fn parse_line(&mut self, line: &LineCursor<'_>) -> Result<(), LoadError> {
        if let Some(payload) = line.text.strip_prefix(VERTEX_PREFIX) {
            let vertex = self.parse_vertex(line, payload);
            push(&mut self.vertices, vertex).map_err(|_| self.out_of_memory())
        } else if let Some(payload) = line.text.strip_prefix(TEX_COORD_PREFIX) {
            let tex_coord = self.parse_tex_coord(line, payload);
            push(&mut self.tex_coords, tex_coord).map_err(|_| self.out_of_memory())
        } else if let Some(payload) = line.text.strip_prefix(NORMAL_PREFIX) {
            let normal = self.parse_normal(line, payload);
            push(&mut self.normals, normal).map_err(|_| self.out_of_memory())
        } else if let Some(payload) = line.text.strip_prefix(FACE_PREFIX) {
            let face = self.parse_face(line, payload)?;
            push(&mut self.faces, face).map_err(|_| self.out_of_memory())
        } else {
            Ok(())
        }
    }

    fn parse_vertex(&self, line: &LineCursor<'_>, payload: &str) -> Vec3 {
        match self.patterns.vec3.parse(payload) {
            Some([x, y, z]) => Vec3::new(x, y, z),
            None => {
                log::warn!(
                    "Ill-formed vertex at {} (defaulting to {:?})",
                    line,
                    DEFAULT_VERTEX
                );
                DEFAULT_VERTEX
            }
        }
    }

    fn parse_tex_coord(&self, line: &LineCursor<'_>, payload: &str) -> Vec2 {
        match self.patterns.vec2.parse(payload) {
            Some([u, v]) => Vec2::new(u, v),
            None => {
                log::warn!(
                    "Ill-formed texture coordinates at {} (defaulting to {:?})",
                    line,
                    DEFAULT_TEX_COORD
                );
                DEFAULT_TEX_COORD
            }
        }
    }

    fn parse_normal(&self, line: &LineCursor<'_>, payload: &str) -> Vec3 {
        match self.patterns.vec3.parse(payload) {
            Some([x, y, z]) => match Vec3::new(x, y, z).try_normalize() {
                Some(normal) => normal,
                None => {
                    log::warn!(
                        "Degenerate normal at {} (defaulting to {:?})",
                        line,
                        DEFAULT_NORMAL
                    );
                    DEFAULT_NORMAL
                }
            },
            None => {
                log::warn!(
                    "Ill-formed normal at {} (defaulting to {:?})",
                    line,
                    DEFAULT_NORMAL
                );
                DEFAULT_NORMAL
            }
        }
    }

    fn parse_face(&self, line: &LineCursor<'_>, payload: &str) -> Result<Face, LoadError> {
        let limits = PoolSizes {
            vertices: self.vertices.len(),
            tex_coords: self.tex_coords.len(),
            normals: self.normals.len(),
        };

        let mut vertex_indices = Vec::new();
        let mut tex_coord_indices = Vec::new();
        let mut normal_indices = Vec::new();

        for triple in payload.split_ascii_whitespace() {
            let mut parts = triple.split('/');
            let (v, vt, vn) = match (parts.next(), parts.next(), parts.next(), parts.next()) {
                (Some(v), Some(vt), Some(vn), None) => (v, vt, vn),
                _ => return Err(self.malformed(line, FaceFault::BadTriple(triple.to_string()))),
            };

            let v = resolve_index(v, limits.vertices, Pool::Vertex)
                .map_err(|fault| self.malformed(line, fault))?;
            let vt = resolve_index(vt, limits.tex_coords, Pool::TexCoord)
                .map_err(|fault| self.malformed(line, fault))?;
            let vn = resolve_index(vn, limits.normals, Pool::Normal)
                .map_err(|fault| self.malformed(line, fault))?;

            push(&mut vertex_indices, v).map_err(|_| self.out_of_memory())?;
            push(&mut tex_coord_indices, vt).map_err(|_| self.out_of_memory())?;
            push(&mut normal_indices, vn).map_err(|_| self.out_of_memory())?;
        }

        if vertex_indices.len() < MIN_FACE_CORNERS {
            return Err(self.malformed(line, FaceFault::TooFewCorners(vertex_indices.len())));
        }

        vertex_indices.shrink_to_fit();
        tex_coord_indices.shrink_to_fit();
        normal_indices.shrink_to_fit();

        Face::new(vertex_indices, tex_coord_indices, normal_indices)
            .ok_or_else(|| self.malformed(line, FaceFault::MismatchedLists))
    }

    fn finish(mut self) -> Result<Model, LoadError> {
        self.vertices.shrink_to_fit();
        self.tex_coords.shrink_to_fit();
        self.normals.shrink_to_fit();
        self.faces.shrink_to_fit();

        log::debug!(
            "Loaded {}: {} vertices, {} texture coordinates, {} normals, {} faces",
            self.source,
            self.vertices.len(),
            self.tex_coords.len(),
            self.normals.len(),
            self.faces.len()
        );

        Ok(Model::from_parts(
            self.vertices,
            self.tex_coords,
            self.normals,
            self.faces,
        ))
    }

    fn malformed(&self, line: &LineCursor<'_>, fault: FaceFault) -> LoadError {
        LoadError::MalformedFace {
            file: self.source.to_string(),
            line: line.number,
            fault,
        }
    }

    fn out_of_memory(&self) -> LoadError {
        LoadError::OutOfMemory {
            file: self.source.to_string(),
        }
    }
}

/// Append with a fallible reservation instead of aborting on allocation failure.
fn push<T>(pool: &mut Vec<T>, value: T) -> Result<(), TryReserveError> {
    pool.try_reserve(1)?;
    pool.push(value);
    Ok(())
}

/// Resolve a 1-based (or negative, relative) index into a 0-based one.
fn resolve_index(text: &str, pool_size: usize, pool: Pool) -> Result<usize, FaceFault> {
    let index: i64 = text
        .parse()
        .map_err(|_| FaceFault::BadIndex(text.to_string()))?;

    let size = i64::try_from(pool_size).unwrap_or(i64::MAX);
    let one_based = if index < 0 {
        size.saturating_add(index).saturating_add(1)
    } else {
        index
    };

    let zero_based = one_based.saturating_sub(1);
    if zero_based < 0 || zero_based >= size {
        return Err(FaceFault::IndexOutOfRange {
            pool,
            index,
            pool_size,
        });
    }
    // In [0, pool_size), so it fits in usize.
    Ok(zero_based as usize)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::io::Cursor;

    fn parse_str(text: &str) -> Result<Model, LoadError> {
        parse(Cursor::new(text), "test.obj")
    }

    const TRIANGLE: &str = "\
v 0.0 0.0 0.0
v 1.0 0.0 0.0
v 0.0 1.0 0.0
vt 0.0 0.0
vn 0.0 0.0 1.0
f 1/1/1 2/1/1 3/1/1
";

    #[test]
    fn parses_pools_and_faces() {
        let model = parse_str(TRIANGLE).unwrap();
        assert_eq!(model.vertices().len(), 3);
        assert_eq!(model.vertices()[1], Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(model.tex_coords(), &[Vec2::ZERO]);
        assert_eq!(model.normals(), &[Vec3::new(0.0, 0.0, 1.0)]);
        assert_eq!(model.faces().len(), 1);
        assert_eq!(model.faces()[0].vertex_indices(), &[0, 1, 2]);
        assert_eq!(model.faces()[0].tex_coord_indices(), &[0, 0, 0]);
    }

    #[test]
    fn malformed_vertex_defaults_and_continues() {
        let text = "v 1.0 abc 2.0\nv 1.0 2.0 3.0\n";
        let model = parse_str(text).unwrap();
        assert_eq!(model.vertices(), &[DEFAULT_VERTEX, Vec3::new(1.0, 2.0, 3.0)]);
    }

    #[test]
    fn malformed_tex_coord_and_normal_default() {
        let text = "vt 0.5\nvn x y z\nvn 0.0 0.0 0.0\n";
        let model = parse_str(text).unwrap();
        assert_eq!(model.tex_coords(), &[DEFAULT_TEX_COORD]);
        assert_eq!(model.normals(), &[DEFAULT_NORMAL, DEFAULT_NORMAL]);
    }

    #[test]
    fn normals_are_normalized() {
        let model = parse_str("vn 0.0 3.0 4.0\n").unwrap();
        let n = model.normals()[0];
        assert_relative_eq!(n.magnitude(), 1.0, epsilon = 1e-6);
        assert_relative_eq!(n.y, 0.6, epsilon = 1e-6);
    }

    #[test]
    fn integer_coordinates_do_not_match_the_decimal_grammar() {
        let model = parse_str("v 1 2 3\n").unwrap();
        assert_eq!(model.vertices(), &[DEFAULT_VERTEX]);
    }

    #[test]
    fn unknown_directives_and_blank_lines_are_ignored() {
        let text = "# comment\n\no cube\ng group\nusemtl red\ns off\nvp 1.0\nv 1.0 1.0 1.0\n";
        let model = parse_str(text).unwrap();
        assert_eq!(model.vertices().len(), 1);
        assert!(model.faces().is_empty());
    }

    #[test]
    fn crlf_line_endings_are_accepted() {
        let text = TRIANGLE.replace('\n', "\r\n");
        let model = parse_str(&text).unwrap();
        assert_eq!(model.faces()[0].normal_indices(), &[0, 0, 0]);
    }

    #[test]
    fn invalid_utf8_is_tolerated() {
        let mut bytes = b"v 1.0 2.0 3.0\n# ".to_vec();
        bytes.extend_from_slice(&[0xff, 0xfe, b'\n']);
        bytes.extend_from_slice(b"v \xff 1.0\n");
        let model = parse(Cursor::new(bytes), "bytes").unwrap();
        assert_eq!(model.vertices(), &[Vec3::new(1.0, 2.0, 3.0), DEFAULT_VERTEX]);
    }

    #[test]
    fn negative_index_counts_back_from_running_total() {
        let text = "\
v 0.0 0.0 0.0
v 1.0 0.0 0.0
v 0.0 1.0 0.0
vt 0.0 0.0
vn 0.0 0.0 1.0
f -3/-1/-1 -2/-1/-1 -1/-1/-1
v 5.0 5.0 5.0
f -1/1/1 1/1/1 2/1/1
";
        let model = parse_str(text).unwrap();
        assert_eq!(model.faces()[0].vertex_indices(), &[0, 1, 2]);
        // After the fourth vertex, -1 is index 3
        assert_eq!(model.faces()[1].vertex_indices(), &[3, 0, 1]);
    }

    #[test]
    fn out_of_range_index_fails_the_load() {
        let text = format!("{TRIANGLE}f 1/1/1 2/1/1 999/1/1\n");
        match parse_str(&text) {
            Err(LoadError::MalformedFace { line, fault, .. }) => {
                assert_eq!(line, 7);
                assert_eq!(
                    fault,
                    FaceFault::IndexOutOfRange {
                        pool: Pool::Vertex,
                        index: 999,
                        pool_size: 3
                    }
                );
            }
            other => panic!("expected MalformedFace, got {other:?}"),
        }
    }

    #[test]
    fn forward_references_fail() {
        // Pool sizes are running totals: vertex 3 is not declared yet
        let text = "v 0.0 0.0 0.0\nv 1.0 0.0 0.0\nvt 0.0 0.0\nvn 0.0 1.0 0.0\nf 1/1/1 2/1/1 3/1/1\nv 0.0 1.0 0.0\n";
        assert!(matches!(
            parse_str(text),
            Err(LoadError::MalformedFace { line: 5, .. })
        ));
    }

    #[test]
    fn zero_and_too_negative_indices_fail() {
        for face in ["f 0/1/1 1/1/1 2/1/1", "f -4/1/1 1/1/1 2/1/1"] {
            let text = format!("{TRIANGLE}{face}\n");
            assert!(matches!(
                parse_str(&text),
                Err(LoadError::MalformedFace {
                    fault: FaceFault::IndexOutOfRange { .. },
                    ..
                })
            ));
        }
    }

    #[test]
    fn missing_tex_coord_pool_fails() {
        let text = "v 0.0 0.0 0.0\nv 1.0 0.0 0.0\nv 0.0 1.0 0.0\nvn 0.0 0.0 1.0\nf 1/1/1 2/1/1 3/1/1\n";
        match parse_str(text) {
            Err(LoadError::MalformedFace {
                fault: FaceFault::IndexOutOfRange { pool, .. },
                ..
            }) => assert_eq!(pool, Pool::TexCoord),
            other => panic!("expected MalformedFace, got {other:?}"),
        }
    }

    #[test]
    fn malformed_triples_fail() {
        for (face, expected) in [
            ("f 1/1 2/1/1 3/1/1", FaceFault::BadTriple("1/1".into())),
            ("f 1/1/1/1 2/1/1 3/1/1", FaceFault::BadTriple("1/1/1/1".into())),
            ("f 1//1 2/1/1 3/1/1", FaceFault::BadIndex("".into())),
            ("f a/1/1 2/1/1 3/1/1", FaceFault::BadIndex("a".into())),
            ("f 1/1/1 2/1/1", FaceFault::TooFewCorners(2)),
        ] {
            let text = format!("{TRIANGLE}{face}\n");
            match parse_str(&text) {
                Err(LoadError::MalformedFace { fault, .. }) => assert_eq!(fault, expected),
                other => panic!("{face}: expected MalformedFace, got {other:?}"),
            }
        }
    }

    #[test]
    fn polygon_faces_keep_all_corners() {
        let text = "\
v 0.0 0.0 0.0
v 1.0 0.0 0.0
v 1.0 1.0 0.0
v 0.0 1.0 0.0
vt 0.0 0.0
vt 1.0 0.0
vt 1.0 1.0
vt 0.0 1.0
vn 0.0 0.0 1.0
f 1/1/1 2/2/1 3/3/1 4/4/1
";
        let model = parse_str(text).unwrap();
        let face = &model.faces()[0];
        assert_eq!(face.len(), 4);
        assert_eq!(face.tex_coord_indices(), &[0, 1, 2, 3]);
        assert_eq!(model.triangle_count(), 2);
    }

    #[test]
    fn extra_whitespace_between_triples_is_allowed() {
        let text = format!("{}f  1/1/1\t2/1/1   3/1/1  \n", TRIANGLE);
        let model = parse_str(&text).unwrap();
        assert_eq!(model.faces().len(), 2);
    }

    #[test]
    fn missing_file_is_reported() {
        let path = std::env::temp_dir().join("tinyrast-definitely-missing.obj");
        assert!(matches!(load(&path), Err(LoadError::FileNotFound { .. })));
    }

    #[test]
    fn load_reads_from_disk() {
        let path = std::env::temp_dir().join(format!("tinyrast-load-{}.obj", std::process::id()));
        std::fs::write(&path, TRIANGLE).unwrap();
        let model = load(&path);
        std::fs::remove_file(&path).ok();
        assert_eq!(model.unwrap().vertices().len(), 3);
    }

    #[test]
    fn line_cursor_formats_as_file_and_line() {
        let cursor = LineCursor {
            text: "v 1.0",
            byte_len: 5,
            source: "cube.obj",
            number: 12,
        };
        assert_eq!(cursor.to_string(), "cube.obj:12");
    }

    /// Collects warning messages so diagnostics can be asserted on.
    struct WarningCapture {
        messages: std::sync::Mutex<Vec<String>>,
    }

    impl log::Log for WarningCapture {
        fn enabled(&self, metadata: &log::Metadata<'_>) -> bool {
            metadata.level() <= log::Level::Warn
        }

        fn log(&self, record: &log::Record<'_>) {
            if self.enabled(record.metadata()) {
                self.messages.lock().unwrap().push(record.args().to_string());
            }
        }

        fn flush(&self) {}
    }

    static WARNINGS: WarningCapture = WarningCapture {
        messages: std::sync::Mutex::new(Vec::new()),
    };

    /// Warnings mentioning `source`, in emission order.
    fn warnings_for(source: &str) -> Vec<String> {
        WARNINGS
            .messages
            .lock()
            .unwrap()
            .iter()
            .filter(|message| message.contains(source))
            .cloned()
            .collect()
    }

    #[test]
    fn data_quality_warnings_name_file_and_line() {
        // Only this test installs a logger in the unit-test binary
        log::set_logger(&WARNINGS).ok();
        log::set_max_level(log::LevelFilter::Warn);

        let text = "v 1.0 2.0 3.0\nv bad\nvt x\nvn 0.0 0.0 0.0\nvn nope\nv 4.0 5.0 6.0\n";
        let model = parse(Cursor::new(text), "warned.obj").unwrap();
        assert_eq!(model.vertices().len(), 3);

        let warnings = warnings_for("warned.obj:");
        assert_eq!(warnings.len(), 4, "{warnings:?}");
        assert!(warnings[0].contains("vertex at warned.obj:2"));
        assert!(warnings[1].contains("texture coordinates at warned.obj:3"));
        assert!(warnings[2].contains("normal at warned.obj:4"));
        assert!(warnings[3].contains("normal at warned.obj:5"));
        assert!(warnings.iter().all(|w| w.contains("defaulting to")));
    }
}
