//! Instruction categories
//!
//! Tags are part of the persisted slice format (`unitType` of every content line),
//! so the integer values must never be reordered.

use serde::{Deserialize, Serialize};
use std::convert::TryFrom;
use std::fmt;

use crate::shared::models::InvokeKind;

// ═══════════════════════════════════════════════════════════════════════════
// UnitType
// ═══════════════════════════════════════════════════════════════════════════

/// Closed set of instruction categories with stable integer tags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "i32", try_from = "i32")]
pub enum UnitType {
    VirtualInvoke,
    StaticInvoke,
    InterfaceInvoke,
    SpecialInvoke,
    AssignVirtualInvoke,
    AssignStaticInvoke,
    AssignInterfaceInvoke,
    AssignSpecialInvoke,
    ParameterIdentity,
    CaughtExceptionIdentity,
    NewInstance,
    NewArray,
    NewException,
    AssignConstant,
    AssignVariable,
    AssignArrayElement,
    AssignField,
    AssignAdd,
    ArrayStoreConstant,
    ArrayStoreVariable,
    FieldStoreConstant,
    FieldStoreVariable,
    Cast,
    LengthOf,
    InstanceOf,
    If,
    Goto,
    Switch,
    ReturnValue,
    ReturnVoid,
}

const ALL: [UnitType; 30] = [
    UnitType::VirtualInvoke,
    UnitType::StaticInvoke,
    UnitType::InterfaceInvoke,
    UnitType::SpecialInvoke,
    UnitType::AssignVirtualInvoke,
    UnitType::AssignStaticInvoke,
    UnitType::AssignInterfaceInvoke,
    UnitType::AssignSpecialInvoke,
    UnitType::ParameterIdentity,
    UnitType::CaughtExceptionIdentity,
    UnitType::NewInstance,
    UnitType::NewArray,
    UnitType::NewException,
    UnitType::AssignConstant,
    UnitType::AssignVariable,
    UnitType::AssignArrayElement,
    UnitType::AssignField,
    UnitType::AssignAdd,
    UnitType::ArrayStoreConstant,
    UnitType::ArrayStoreVariable,
    UnitType::FieldStoreConstant,
    UnitType::FieldStoreVariable,
    UnitType::Cast,
    UnitType::LengthOf,
    UnitType::InstanceOf,
    UnitType::If,
    UnitType::Goto,
    UnitType::Switch,
    UnitType::ReturnValue,
    UnitType::ReturnVoid,
];

impl UnitType {
    /// Every category in tag order
    pub fn all() -> &'static [UnitType] {
        &ALL
    }

    pub fn tag(self) -> i32 {
        self as i32
    }

    pub fn from_tag(tag: i32) -> Option<Self> {
        usize::try_from(tag).ok().and_then(|i| ALL.get(i).copied())
    }

    /// Plain or assigning invocation
    pub fn is_invoke(self) -> bool {
        self.tag() <= UnitType::AssignSpecialInvoke.tag()
    }

    pub fn is_assigning_invoke(self) -> bool {
        matches!(
            self,
            UnitType::AssignVirtualInvoke
                | UnitType::AssignStaticInvoke
                | UnitType::AssignInterfaceInvoke
                | UnitType::AssignSpecialInvoke
        )
    }

    /// Dispatch kind of an invocation category
    pub fn invoke_kind(self) -> Option<InvokeKind> {
        match self {
            UnitType::VirtualInvoke | UnitType::AssignVirtualInvoke => Some(InvokeKind::Virtual),
            UnitType::StaticInvoke | UnitType::AssignStaticInvoke => Some(InvokeKind::Static),
            UnitType::InterfaceInvoke | UnitType::AssignInterfaceInvoke => {
                Some(InvokeKind::Interface)
            }
            UnitType::SpecialInvoke | UnitType::AssignSpecialInvoke => Some(InvokeKind::Special),
            _ => None,
        }
    }

    pub fn is_identity(self) -> bool {
        matches!(
            self,
            UnitType::ParameterIdentity | UnitType::CaughtExceptionIdentity
        )
    }

    pub fn is_allocation(self) -> bool {
        matches!(
            self,
            UnitType::NewInstance | UnitType::NewArray | UnitType::NewException
        )
    }

    /// Local-defining assignment (excluding invocations and identities)
    pub fn is_assignment(self) -> bool {
        matches!(
            self,
            UnitType::AssignConstant
                | UnitType::AssignVariable
                | UnitType::AssignArrayElement
                | UnitType::AssignField
                | UnitType::AssignAdd
                | UnitType::Cast
                | UnitType::LengthOf
                | UnitType::InstanceOf
        ) || self.is_allocation()
    }

    /// Array or field store
    pub fn is_store(self) -> bool {
        matches!(
            self,
            UnitType::ArrayStoreConstant
                | UnitType::ArrayStoreVariable
                | UnitType::FieldStoreConstant
                | UnitType::FieldStoreVariable
        )
    }

    pub fn is_branch(self) -> bool {
        matches!(self, UnitType::If | UnitType::Goto | UnitType::Switch)
    }

    pub fn is_return(self) -> bool {
        matches!(self, UnitType::ReturnValue | UnitType::ReturnVoid)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            UnitType::VirtualInvoke => "virtual_invoke",
            UnitType::StaticInvoke => "static_invoke",
            UnitType::InterfaceInvoke => "interface_invoke",
            UnitType::SpecialInvoke => "special_invoke",
            UnitType::AssignVirtualInvoke => "assign_virtual_invoke",
            UnitType::AssignStaticInvoke => "assign_static_invoke",
            UnitType::AssignInterfaceInvoke => "assign_interface_invoke",
            UnitType::AssignSpecialInvoke => "assign_special_invoke",
            UnitType::ParameterIdentity => "parameter_identity",
            UnitType::CaughtExceptionIdentity => "caught_exception_identity",
            UnitType::NewInstance => "new_instance",
            UnitType::NewArray => "new_array",
            UnitType::NewException => "new_exception",
            UnitType::AssignConstant => "assign_constant",
            UnitType::AssignVariable => "assign_variable",
            UnitType::AssignArrayElement => "assign_array_element",
            UnitType::AssignField => "assign_field",
            UnitType::AssignAdd => "assign_add",
            UnitType::ArrayStoreConstant => "array_store_constant",
            UnitType::ArrayStoreVariable => "array_store_variable",
            UnitType::FieldStoreConstant => "field_store_constant",
            UnitType::FieldStoreVariable => "field_store_variable",
            UnitType::Cast => "cast",
            UnitType::LengthOf => "length_of",
            UnitType::InstanceOf => "instance_of",
            UnitType::If => "if",
            UnitType::Goto => "goto",
            UnitType::Switch => "switch",
            UnitType::ReturnValue => "return_value",
            UnitType::ReturnVoid => "return_void",
        }
    }
}

impl From<UnitType> for i32 {
    fn from(unit_type: UnitType) -> i32 {
        unit_type.tag()
    }
}

impl TryFrom<i32> for UnitType {
    type Error = String;

    fn try_from(tag: i32) -> Result<Self, Self::Error> {
        UnitType::from_tag(tag).ok_or_else(|| format!("unknown unit type tag {}", tag))
    }
}

impl fmt::Display for UnitType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
