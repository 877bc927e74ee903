//! GL-style integer constants and the small enumerations built from them.
//!
//! Named and valued the way `gltf_json::accessor`/`gltf_json::mesh` expose
//! them (`pub const BYTE: u32 = 5120`, etc.) so that a reader already
//! familiar with the glTF crate ecosystem recognizes the numbers.

/// Corresponds to `GL_BYTE`.
pub const COMPONENT_I8: u32 = 5120;
/// Corresponds to `GL_UNSIGNED_BYTE`.
pub const COMPONENT_U8: u32 = 5121;
/// Corresponds to `GL_SHORT`.
pub const COMPONENT_I16: u32 = 5122;
/// Corresponds to `GL_UNSIGNED_SHORT`.
pub const COMPONENT_U16: u32 = 5123;
/// `GL_INT`. Not a valid glTF accessor component type; listed only so range
/// checks can name it in error messages.
pub const COMPONENT_I32_UNSUPPORTED: u32 = 5124;
/// Corresponds to `GL_UNSIGNED_INT`.
pub const COMPONENT_U32: u32 = 5125;
/// Corresponds to `GL_FLOAT`.
pub const COMPONENT_F32: u32 = 5126;

/// The component type of an accessor, resolved from the integer constants
/// above.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ComponentType {
    I8,
    U8,
    I16,
    U16,
    U32,
    F32,
}

impl ComponentType {
    pub fn from_gl_enum(value: u32) -> Option<Self> {
        match value {
            COMPONENT_I8 => Some(ComponentType::I8),
            COMPONENT_U8 => Some(ComponentType::U8),
            COMPONENT_I16 => Some(ComponentType::I16),
            COMPONENT_U16 => Some(ComponentType::U16),
            COMPONENT_U32 => Some(ComponentType::U32),
            COMPONENT_F32 => Some(ComponentType::F32),
            _ => None,
        }
    }

    pub fn as_gl_enum(self) -> u32 {
        match self {
            ComponentType::I8 => COMPONENT_I8,
            ComponentType::U8 => COMPONENT_U8,
            ComponentType::I16 => COMPONENT_I16,
            ComponentType::U16 => COMPONENT_U16,
            ComponentType::U32 => COMPONENT_U32,
            ComponentType::F32 => COMPONENT_F32,
        }
    }

    /// Size of a single component in bytes.
    pub fn size_bytes(self) -> u32 {
        match self {
            ComponentType::I8 | ComponentType::U8 => 1,
            ComponentType::I16 | ComponentType::U16 => 2,
            ComponentType::U32 | ComponentType::F32 => 4,
        }
    }
}

/// The element type of an accessor: scalar, vector, or matrix shape.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ElementType {
    Scalar,
    Vec2,
    Vec3,
    Vec4,
    Mat2,
    Mat3,
    Mat4,
}

impl ElementType {
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "SCALAR" => Some(ElementType::Scalar),
            "VEC2" => Some(ElementType::Vec2),
            "VEC3" => Some(ElementType::Vec3),
            "VEC4" => Some(ElementType::Vec4),
            "MAT2" => Some(ElementType::Mat2),
            "MAT3" => Some(ElementType::Mat3),
            "MAT4" => Some(ElementType::Mat4),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ElementType::Scalar => "SCALAR",
            ElementType::Vec2 => "VEC2",
            ElementType::Vec3 => "VEC3",
            ElementType::Vec4 => "VEC4",
            ElementType::Mat2 => "MAT2",
            ElementType::Mat3 => "MAT3",
            ElementType::Mat4 => "MAT4",
        }
    }

    /// Number of scalar components this element type is made of.
    pub fn component_count(self) -> u32 {
        match self {
            ElementType::Scalar => 1,
            ElementType::Vec2 => 2,
            ElementType::Vec3 => 3,
            ElementType::Vec4 => 4,
            ElementType::Mat2 => 4,
            ElementType::Mat3 => 9,
            ElementType::Mat4 => 16,
        }
    }
}

/// Primitive topology mode, defaulting to [`Mode::Triangles`].
pub const MODE_POINTS: u32 = 0;
pub const MODE_LINES: u32 = 1;
pub const MODE_LINE_LOOP: u32 = 2;
pub const MODE_LINE_STRIP: u32 = 3;
pub const MODE_TRIANGLES: u32 = 4;
pub const MODE_TRIANGLE_STRIP: u32 = 5;
pub const MODE_TRIANGLE_FAN: u32 = 6;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    Points,
    Lines,
    LineLoop,
    LineStrip,
    Triangles,
    TriangleStrip,
    TriangleFan,
}

impl Default for Mode {
    fn default() -> Self {
        Mode::Triangles
    }
}

impl Mode {
    pub fn from_gl_enum(value: u32) -> Option<Self> {
        match value {
            MODE_POINTS => Some(Mode::Points),
            MODE_LINES => Some(Mode::Lines),
            MODE_LINE_LOOP => Some(Mode::LineLoop),
            MODE_LINE_STRIP => Some(Mode::LineStrip),
            MODE_TRIANGLES => Some(Mode::Triangles),
            MODE_TRIANGLE_STRIP => Some(Mode::TriangleStrip),
            MODE_TRIANGLE_FAN => Some(Mode::TriangleFan),
            _ => None,
        }
    }

    pub fn as_gl_enum(self) -> u32 {
        match self {
            Mode::Points => MODE_POINTS,
            Mode::Lines => MODE_LINES,
            Mode::LineLoop => MODE_LINE_LOOP,
            Mode::LineStrip => MODE_LINE_STRIP,
            Mode::Triangles => MODE_TRIANGLES,
            Mode::TriangleStrip => MODE_TRIANGLE_STRIP,
            Mode::TriangleFan => MODE_TRIANGLE_FAN,
        }
    }
}

/// A normalized primitive attribute semantic: `(tag, set_index)`. `set_index`
/// is `0` for semantics that don't carry a numeric suffix (`POSITION`,
/// `NORMAL`, `TANGENT`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Semantic {
    Position,
    Normal,
    Tangent,
    TexCoord(u32),
    Color(u32),
    Joints(u32),
    Weights(u32),
}

impl Semantic {
    /// Parses a JSON attribute key into `(semantic, set_index)`, or `None`
    /// if the key is not a recognized semantic (spec §4.3: unrecognized
    /// semantics are silently dropped). Numeric suffixes must be "digits
    /// only, full consumption" — `TEXCOORD_01` and `TEXCOORD_1a` are both
    /// rejected (dropped), matching the reference loader's strict suffix
    /// parse.
    pub fn parse(key: &str) -> Option<(Self, u32)> {
        match key {
            "POSITION" => return Some((Semantic::Position, 0)),
            "NORMAL" => return Some((Semantic::Normal, 0)),
            "TANGENT" => return Some((Semantic::Tangent, 0)),
            _ => {}
        }
        if let Some(rest) = key.strip_prefix("TEXCOORD_") {
            return parse_strict_suffix(rest).map(|n| (Semantic::TexCoord(n), n));
        }
        if let Some(rest) = key.strip_prefix("COLOR_") {
            return parse_strict_suffix(rest).map(|n| (Semantic::Color(n), n));
        }
        if let Some(rest) = key.strip_prefix("JOINTS_") {
            return parse_strict_suffix(rest).map(|n| (Semantic::Joints(n), n));
        }
        if let Some(rest) = key.strip_prefix("WEIGHTS_") {
            return parse_strict_suffix(rest).map(|n| (Semantic::Weights(n), n));
        }
        None
    }
}

/// `digits only, full consumption` suffix parse used by every `_n` semantic.
/// Rejects empty suffixes, leading `+`/`-`, and any non-digit character.
fn parse_strict_suffix(s: &str) -> Option<u32> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse::<u32>().ok()
}

/// Material `alphaMode`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AlphaMode {
    Opaque,
    Mask,
    Blend,
}

impl Default for AlphaMode {
    fn default() -> Self {
        AlphaMode::Opaque
    }
}

impl AlphaMode {
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "OPAQUE" => Some(AlphaMode::Opaque),
            "MASK" => Some(AlphaMode::Mask),
            "BLEND" => Some(AlphaMode::Blend),
            _ => None,
        }
    }
}

/// Sampler wrap mode default, `GL_REPEAT`.
pub const WRAP_REPEAT: u32 = 10497;
