//! # Transaction Context
//!
//! Append-only build unit for one attempt. Operations live in a growable
//! sequence and handles are indices into it; an operation may only refer to
//! results of strictly earlier operations of the same context.
//!
//! Inputs (objects and pure values) are kept in a separate table the way a
//! programmable transaction block stores them, so one shared object used by
//! several calls appears once.

use super::errors::{RegistrationError, Result};
use super::invariants::invariant_backward_reference;
use super::value_objects::{MoveTarget, ObjectId, SuiAddress, SUI_CLOCK_OBJECT_ID};
use serde::{Deserialize, Serialize};
use std::marker::PhantomData;
use uuid::Uuid;

// =============================================================================
// HANDLE KINDS (zero-sized markers)
// =============================================================================

/// Marker: the payment intent.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IntentKind;

/// Marker: an amount computed on chain.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AmountKind;

/// Marker: a registered price update (price info object).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PriceInfoKind;

/// Marker: a coin carved out by a split.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CoinKind;

/// Marker: the settlement receipt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReceiptKind;

/// Marker: the registered name NFT.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NftKind;

/// Marker: a call whose result is never consumed (in-place updates).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UnitKind;

/// Opaque reference to the output of an appended operation.
///
/// Never dereferenced by the composer, only passed forward. The kind marker
/// keeps e.g. a receipt from being passed where an intent is expected.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Handle<K> {
    context: Uuid,
    index: u16,
    nested: Option<u16>,
    _kind: PhantomData<K>,
}

impl<K> Handle<K> {
    fn new(context: Uuid, index: u16, nested: Option<u16>) -> Self {
        Self {
            context,
            index,
            nested,
            _kind: PhantomData,
        }
    }

    /// Index of the producing operation.
    pub fn index(&self) -> u16 {
        self.index
    }

    /// Context this handle belongs to.
    pub fn context_id(&self) -> Uuid {
        self.context
    }
}

// =============================================================================
// INPUTS, ARGUMENTS, COMMANDS
// =============================================================================

/// Pure (by-value) input.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum PureValue {
    /// `u8`
    U8(u8),
    /// `u64`
    U64(u64),
    /// UTF-8 `String`
    String(String),
    /// `address`
    Address(SuiAddress),
    /// `vector<u8>`
    Bytes(#[serde(with = "hex_bytes")] Vec<u8>),
}

/// Entry in the input table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Input {
    /// Object passed by id; the submitter resolves version and ownership.
    Object {
        /// Object id
        id: ObjectId,
    },
    /// Pure value.
    Pure {
        /// Value
        value: PureValue,
    },
}

/// Argument of a command.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "index", rename_all = "snake_case")]
pub enum Argument {
    /// The gas coin of the sender.
    GasCoin,
    /// Entry of the input table.
    Input(u16),
    /// Whole result of an earlier command.
    Result(u16),
    /// One element of a multi-result command (e.g. split).
    NestedResult(u16, u16),
}

impl Argument {
    fn result_index(&self) -> Option<u16> {
        match self {
            Self::Result(i) | Self::NestedResult(i, _) => Some(*i),
            _ => None,
        }
    }
}

/// Low-level command stored in the context.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum Command {
    /// Move function call.
    MoveCall {
        /// Call target
        target: MoveTarget,
        /// Generic type arguments
        type_arguments: Vec<String>,
        /// Arguments
        arguments: Vec<Argument>,
    },
    /// Split `amounts` out of `coin`; one nested result per amount.
    SplitCoins {
        /// Source coin
        coin: Argument,
        /// Amounts to carve
        amounts: Vec<Argument>,
    },
    /// Transfer objects to `recipient`.
    TransferObjects {
        /// Objects to transfer
        objects: Vec<Argument>,
        /// Recipient (pure address input)
        recipient: Argument,
    },
}

impl Command {
    fn arguments(&self) -> Vec<Argument> {
        match self {
            Self::MoveCall { arguments, .. } => arguments.clone(),
            Self::SplitCoins { coin, amounts } => {
                std::iter::once(*coin).chain(amounts.iter().copied()).collect()
            }
            Self::TransferObjects { objects, recipient } => objects
                .iter()
                .copied()
                .chain(std::iter::once(*recipient))
                .collect(),
        }
    }
}

/// What an operation means in the registration flow.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationKind {
    /// `payment::init_registration`
    InitRegistration,
    /// `payment::init_renewal`
    InitRenewal,
    /// `coupon_house::apply_coupon`
    ApplyCoupon,
    /// `discounts::apply_percentage_discount`
    ApplyHoldingDiscount,
    /// `payments::calculate_price_after_discount`
    CalculatePrice,
    /// Price update registered from the oracle payload
    RegisterPriceUpdate,
    /// `payments::calculate_price` (conversion with the quote)
    ConvertPrice,
    /// Split funds out of the funding source
    SplitFunds,
    /// `payments::handle_base_payment`
    SettleBase,
    /// `payments::handle_payment`
    SettleOracle,
    /// `payment::register`
    Claim,
    /// `payment::renew`
    Renew,
    /// Transfer of the registered NFT
    Transfer,
}

impl OperationKind {
    /// Either settlement variant.
    pub fn is_settlement(&self) -> bool {
        matches!(self, Self::SettleBase | Self::SettleOracle)
    }
}

/// An appended operation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Operation {
    /// Meaning in the flow
    pub kind: OperationKind,
    /// Underlying command
    pub command: Command,
}

impl Operation {
    /// Indices of earlier operations this one consumes.
    pub fn referenced_results(&self) -> Vec<u16> {
        self.command
            .arguments()
            .iter()
            .filter_map(Argument::result_index)
            .collect()
    }
}

// =============================================================================
// CONTEXT
// =============================================================================

/// Ordered, mutable build unit owned by one attempt.
#[derive(Debug)]
pub struct TransactionContext {
    id: Uuid,
    inputs: Vec<Input>,
    operations: Vec<Operation>,
}

impl TransactionContext {
    /// Create an empty context.
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            inputs: Vec::new(),
            operations: Vec::new(),
        }
    }

    /// Context id (also carried by every handle it issues).
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Number of appended operations.
    pub fn len(&self) -> usize {
        self.operations.len()
    }

    /// Whether nothing has been appended.
    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// Appended operations in order.
    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    /// Operation kinds in order.
    pub fn kinds(&self) -> Vec<OperationKind> {
        self.operations.iter().map(|op| op.kind).collect()
    }

    /// Input table.
    pub fn inputs(&self) -> &[Input] {
        &self.inputs
    }

    /// Operations that consume the result produced at `index`.
    pub fn consumers_of(&self, index: u16) -> Vec<OperationKind> {
        self.operations
            .iter()
            .filter(|op| op.referenced_results().contains(&index))
            .map(|op| op.kind)
            .collect()
    }

    // -------------------------------------------------------------------------
    // argument constructors
    // -------------------------------------------------------------------------

    fn input_index(index: usize) -> Result<u16> {
        u16::try_from(index).map_err(|_| {
            RegistrationError::IncompleteFlow("context input limit reached".to_string())
        })
    }

    /// Object input, deduplicated by id.
    pub fn object(&mut self, id: ObjectId) -> Result<Argument> {
        let existing = self
            .inputs
            .iter()
            .position(|input| matches!(input, Input::Object { id: seen } if *seen == id));
        if let Some(index) = existing {
            return Ok(Argument::Input(Self::input_index(index)?));
        }
        let index = Self::input_index(self.inputs.len())?;
        self.inputs.push(Input::Object { id });
        Ok(Argument::Input(index))
    }

    /// Pure input.
    pub fn pure(&mut self, value: PureValue) -> Result<Argument> {
        let index = Self::input_index(self.inputs.len())?;
        self.inputs.push(Input::Pure { value });
        Ok(Argument::Input(index))
    }

    /// The shared clock object.
    pub fn clock(&mut self) -> Result<Argument> {
        self.object(SUI_CLOCK_OBJECT_ID)
    }

    /// The sender's gas coin.
    pub fn gas(&self) -> Argument {
        Argument::GasCoin
    }

    /// Argument for a handle issued by this context.
    pub fn arg<K>(&self, handle: &Handle<K>) -> Result<Argument> {
        if handle.context != self.id {
            return Err(RegistrationError::InvalidHandle {
                index: handle.index,
                len: self.operations.len(),
                reason: "handle belongs to another context".to_string(),
            });
        }
        invariant_backward_reference(handle.index, self.operations.len())?;
        Ok(match handle.nested {
            Some(sub) => Argument::NestedResult(handle.index, sub),
            None => Argument::Result(handle.index),
        })
    }

    // -------------------------------------------------------------------------
    // appends
    // -------------------------------------------------------------------------

    fn validate(&self, command: &Command) -> Result<()> {
        self.validate_arguments(&command.arguments())
    }

    fn validate_arguments(&self, arguments: &[Argument]) -> Result<()> {
        for &argument in arguments {
            match argument {
                Argument::Input(i) if usize::from(i) >= self.inputs.len() => {
                    return Err(RegistrationError::InvalidHandle {
                        index: i,
                        len: self.operations.len(),
                        reason: "unknown input".to_string(),
                    });
                }
                Argument::Result(i) | Argument::NestedResult(i, _) => {
                    invariant_backward_reference(i, self.operations.len())?;
                }
                _ => {}
            }
        }
        Ok(())
    }

    fn next_index(&self) -> Result<u16> {
        u16::try_from(self.operations.len()).map_err(|_| {
            RegistrationError::IncompleteFlow("context operation limit reached".to_string())
        })
    }

    fn push(&mut self, kind: OperationKind, command: Command) -> Result<u16> {
        self.validate(&command)?;
        let index = self.next_index()?;
        self.operations.push(Operation { kind, command });
        Ok(index)
    }

    /// Append a Move call and return a handle to its result.
    pub fn move_call<K>(
        &mut self,
        kind: OperationKind,
        target: MoveTarget,
        arguments: Vec<Argument>,
        type_arguments: Vec<String>,
    ) -> Result<Handle<K>> {
        let index = self.push(
            kind,
            Command::MoveCall {
                target,
                type_arguments,
                arguments,
            },
        )?;
        Ok(Handle::new(self.id, index, None))
    }

    /// Append a split and return one coin handle per amount.
    pub fn split_coins(&mut self, coin: Argument, amounts: Vec<Argument>) -> Result<Vec<Handle<CoinKind>>> {
        let count = u16::try_from(amounts.len()).map_err(|_| {
            RegistrationError::IncompleteFlow("too many split amounts".to_string())
        })?;
        let index = self.push(OperationKind::SplitFunds, Command::SplitCoins { coin, amounts })?;
        Ok((0..count)
            .map(|sub| Handle::new(self.id, index, Some(sub)))
            .collect())
    }

    /// Append a transfer of `objects` to `recipient`.
    ///
    /// Nothing is added to the input table when the transfer is rejected.
    pub fn transfer_objects(&mut self, objects: Vec<Argument>, recipient: SuiAddress) -> Result<()> {
        self.next_index()?;
        self.validate_arguments(&objects)?;
        let recipient = self.pure(PureValue::Address(recipient))?;
        self.push(
            OperationKind::Transfer,
            Command::TransferObjects { objects, recipient },
        )?;
        Ok(())
    }

    /// Freeze into the form handed to the submission service.
    pub fn seal(self) -> SealedTransaction {
        SealedTransaction {
            id: self.id,
            inputs: self.inputs,
            operations: self.operations,
        }
    }
}

impl Default for TransactionContext {
    fn default() -> Self {
        Self::new()
    }
}

/// A complete, immutable transaction ready for signing and submission.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SealedTransaction {
    /// Id of the context it was built in
    pub id: Uuid,
    /// Input table
    pub inputs: Vec<Input>,
    /// Operations in execution order
    pub operations: Vec<Operation>,
}

impl SealedTransaction {
    /// Operation kinds in order.
    pub fn kinds(&self) -> Vec<OperationKind> {
        self.operations.iter().map(|op| op.kind).collect()
    }

    /// JSON rendering.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| RegistrationError::SubmissionFailure(format!("serialization: {e}")))
    }
}

mod hex_bytes {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&hex::encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let s = String::deserialize(deserializer)?;
        hex::decode(s).map_err(serde::de::Error::custom)
    }
}
