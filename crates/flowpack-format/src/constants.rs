//! Format constants shared by the compiler and the runtime.

/// Magic bytes at the start of every assets blob.
pub const MAGIC: [u8; 4] = *b"~eez";

pub const MAJOR_VERSION: u8 = 3;
pub const MINOR_VERSION: u8 = 0;

/// Size of the blob header in bytes.
pub const HEADER_SIZE: usize = 12;

/// Color index reserved for `transparent`.
pub const TRANSPARENT_COLOR: u16 = 65535;

/// Component type of every widget in the source-generation family.
pub const LVGL_WIDGET_COMPONENT_TYPE: u16 = 32;

/// First dynamically assigned component type in dashboard projects.
pub const FIRST_DASHBOARD_COMPONENT_TYPE: u16 = 10000;

/// Largest operand of an expression instruction (13 bits).
pub const OPERAND_MAX: u16 = 0x1FFF;

/// Unregistered widget data item / widget action slot.
pub const UNREGISTERED_ITEM: u16 = 0xFFFF;

/// `assets_type` header byte, one per project type.
pub mod assets_type {
    pub const FIRMWARE: u8 = 1;
    pub const LVGL: u8 = 2;
    pub const DASHBOARD: u8 = 3;
}

/// Binary widget type codes.
pub mod widget_type {
    pub const NONE: u8 = 0;
    pub const CONTAINER: u8 = 1;
    pub const LIST: u8 = 2;
    pub const GRID: u8 = 3;
    pub const SELECT: u8 = 4;
    pub const DISPLAY_DATA: u8 = 5;
    pub const TEXT: u8 = 6;
    pub const MULTILINE_TEXT: u8 = 7;
    pub const RECTANGLE: u8 = 8;
    pub const BITMAP: u8 = 9;
    pub const BUTTON: u8 = 10;
    pub const TOGGLE_BUTTON: u8 = 11;
    pub const BUTTON_GROUP: u8 = 12;
    pub const BAR_GRAPH: u8 = 14;
    pub const LAYOUT_VIEW: u8 = 15;
    pub const YT_GRAPH: u8 = 16;
    pub const UP_DOWN: u8 = 17;
    pub const LIST_GRAPH: u8 = 18;
    pub const APP_VIEW: u8 = 19;
    pub const SCROLL_BAR: u8 = 20;
    pub const PROGRESS: u8 = 21;
    pub const CANVAS: u8 = 22;
}

/// Flow component type codes for built-in actions.
pub mod component_type {
    pub const START_ACTION: u16 = 1001;
    pub const END_ACTION: u16 = 1002;
    pub const INPUT_ACTION: u16 = 1003;
    pub const OUTPUT_ACTION: u16 = 1004;
    pub const WATCH_VARIABLE_ACTION: u16 = 1005;
    pub const EVAL_EXPR_ACTION: u16 = 1006;
    pub const SET_VARIABLE_ACTION: u16 = 1007;
    pub const SWITCH_CASE_ACTION: u16 = 1008;
    pub const COMPARE_ACTION: u16 = 1009;
    pub const IS_TRUE_ACTION: u16 = 1010;
    pub const CONSTANT_ACTION: u16 = 1011;
    pub const LOG_ACTION: u16 = 1012;
    pub const CALL_ACTION_ACTION: u16 = 1013;
    pub const DELAY_ACTION: u16 = 1014;
    pub const ERROR_ACTION: u16 = 1015;
    pub const CATCH_ERROR_ACTION: u16 = 1016;
    pub const COUNTER_ACTION: u16 = 1017;
    pub const LOOP_ACTION: u16 = 1018;
    pub const SHOW_PAGE_ACTION: u16 = 1019;
}

/// Component input flag bits.
pub mod input_flags {
    pub const SEQUENCE: u8 = 1 << 0;
    pub const OPTIONAL: u8 = 1 << 1;
}

/// Style flag bits.
pub mod style_flags {
    pub const ALIGN_LEFT: u16 = 0;
    pub const ALIGN_CENTER: u16 = 1;
    pub const ALIGN_RIGHT: u16 = 2;
    pub const ALIGN_TOP: u16 = 0 << 2;
    pub const ALIGN_MIDDLE: u16 = 1 << 2;
    pub const ALIGN_BOTTOM: u16 = 2 << 2;
    pub const BLINK: u16 = 1 << 4;
}

/// Tag byte of a serialized flow value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ValueTypeCode {
    Undefined = 0,
    Null = 1,
    Boolean = 2,
    Int8 = 3,
    Uint8 = 4,
    Int16 = 5,
    Uint16 = 6,
    Int32 = 7,
    Uint32 = 8,
    Int64 = 9,
    Uint64 = 10,
    Float = 11,
    Double = 12,
    String = 13,
    Array = 14,
    StringRef = 15,
    ArrayRef = 16,
    BlobRef = 17,
    Stream = 18,
    Date = 19,
    Json = 20,
}

impl ValueTypeCode {
    pub fn from_u8(v: u8) -> Option<Self> {
        use ValueTypeCode::*;
        const ALL: [ValueTypeCode; 21] = [
            Undefined, Null, Boolean, Int8, Uint8, Int16, Uint16, Int32, Uint32, Int64, Uint64,
            Float, Double, String, Array, StringRef, ArrayRef, BlobRef, Stream, Date, Json,
        ];
        ALL.get(v as usize).copied()
    }
}

/// Expression instruction opcodes (top 3 bits of a 16-bit instruction).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum Opcode {
    PushConstant = 0,
    PushInput = 1,
    PushLocalVar = 2,
    PushGlobalVar = 3,
    PushOutput = 4,
    Operation = 5,
    End = 6,
}

impl Opcode {
    /// Encode `self` with `operand`; `None` when the operand needs more than 13 bits.
    pub fn encode(self, operand: u16) -> Option<u16> {
        (operand <= OPERAND_MAX).then(|| ((self as u16) << 13) | operand)
    }

    pub fn decode(instruction: u16) -> Option<(Self, u16)> {
        let op = match instruction >> 13 {
            0 => Self::PushConstant,
            1 => Self::PushInput,
            2 => Self::PushLocalVar,
            3 => Self::PushGlobalVar,
            4 => Self::PushOutput,
            5 => Self::Operation,
            6 => Self::End,
            _ => return None,
        };
        Some((op, instruction & OPERAND_MAX))
    }
}

/// Operand of an [`Opcode::Operation`] instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum Operation {
    Add = 0,
    Sub = 1,
    Mul = 2,
    Div = 3,
    Mod = 4,
    LeftShift = 5,
    RightShift = 6,
    BinaryAnd = 7,
    BinaryOr = 8,
    BinaryXor = 9,
    Equal = 10,
    NotEqual = 11,
    Less = 12,
    Greater = 13,
    LessOrEqual = 14,
    GreaterOrEqual = 15,
    LogicalAnd = 16,
    LogicalOr = 17,
    UnaryPlus = 18,
    UnaryMinus = 19,
    BinaryInvert = 20,
    Not = 21,
    Conditional = 22,
}

impl Operation {
    pub fn binary(symbol: &str) -> Option<Self> {
        Some(match symbol {
            "+" => Self::Add,
            "-" => Self::Sub,
            "*" => Self::Mul,
            "/" => Self::Div,
            "%" => Self::Mod,
            "<<" => Self::LeftShift,
            ">>" => Self::RightShift,
            "&" => Self::BinaryAnd,
            "|" => Self::BinaryOr,
            "^" => Self::BinaryXor,
            "==" => Self::Equal,
            "!=" => Self::NotEqual,
            "<" => Self::Less,
            ">" => Self::Greater,
            "<=" => Self::LessOrEqual,
            ">=" => Self::GreaterOrEqual,
            "&&" => Self::LogicalAnd,
            "||" => Self::LogicalOr,
            _ => return None,
        })
    }

    pub fn unary(symbol: &str) -> Option<Self> {
        Some(match symbol {
            "+" => Self::UnaryPlus,
            "-" => Self::UnaryMinus,
            "~" => Self::BinaryInvert,
            "!" => Self::Not,
            _ => return None,
        })
    }

    pub fn code(self) -> u16 {
        self as u16
    }
}
