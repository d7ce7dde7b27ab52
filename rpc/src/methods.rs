//! The method catalogue: every remote call the client knows, described as data.
//!
//! Descriptors are declared with Rust-style snake_case names; the wire name is
//! always the camelCase rendering (see [`to_camel_case`]).

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::types::*;

/// Semantic type of a positional parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamType {
    Text,
    Integer,
}

impl ParamType {
    pub fn accepts(self, value: &Value) -> bool {
        match self {
            ParamType::Text => value.is_string(),
            ParamType::Integer => value.is_u64(),
        }
    }

    pub fn describe(self) -> &'static str {
        match self {
            ParamType::Text => "a string",
            ParamType::Integer => "a non-negative integer",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Param {
    pub name: &'static str,
    pub kind: ParamType,
}

const fn text(name: &'static str) -> Param {
    Param {
        name,
        kind: ParamType::Text,
    }
}

const fn integer(name: &'static str) -> Param {
    Param {
        name,
        kind: ParamType::Integer,
    }
}

/// Semantic type of a result element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReturnType {
    Text,
    Integer,
    Account,
    AccountTransactions,
    Auction,
    App,
    Balance,
    Block,
    Chain,
    Script,
    Token,
    TokenData,
    Transaction,
}

impl ReturnType {
    pub fn name(self) -> &'static str {
        match self {
            ReturnType::Text => "string",
            ReturnType::Integer => "integer",
            ReturnType::Account => "Account",
            ReturnType::AccountTransactions => "AccountTransactions",
            ReturnType::Auction => "Auction",
            ReturnType::App => "App",
            ReturnType::Balance => "Balance",
            ReturnType::Block => "Block",
            ReturnType::Chain => "Chain",
            ReturnType::Script => "Script",
            ReturnType::Token => "Token",
            ReturnType::TokenData => "TokenData",
            ReturnType::Transaction => "Transaction",
        }
    }

    /// Decode `value` as one element of this type and re-encode it.
    ///
    /// Used where the caller wants JSON back but the schema must still hold.
    pub fn conform(self, value: Value) -> Result<Value, serde_json::Error> {
        match self {
            ReturnType::Text => conform::<String>(value),
            ReturnType::Integer => conform::<u64>(value),
            ReturnType::Account => conform::<Account>(value),
            ReturnType::AccountTransactions => conform::<AccountTransactions>(value),
            ReturnType::Auction => conform::<Auction>(value),
            ReturnType::App => conform::<App>(value),
            ReturnType::Balance => conform::<Balance>(value),
            ReturnType::Block => conform::<Block>(value),
            ReturnType::Chain => conform::<Chain>(value),
            ReturnType::Script => conform::<Script>(value),
            ReturnType::Token => conform::<Token>(value),
            ReturnType::TokenData => conform::<TokenData>(value),
            ReturnType::Transaction => conform::<Transaction>(value),
        }
    }

    /// Like [`ReturnType::conform`] for an ordered sequence of elements.
    pub fn conform_list(self, value: Value) -> Result<Value, serde_json::Error> {
        let items: Vec<Value> = serde_json::from_value(value)?;
        items
            .into_iter()
            .map(|item| self.conform(item))
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Array)
    }
}

fn conform<T: DeserializeOwned + Serialize>(value: Value) -> Result<Value, serde_json::Error> {
    let decoded: T = serde_json::from_value(value)?;
    serde_json::to_value(decoded)
}

/// How the `result` member of a response is laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultShape {
    /// One element.
    Single,
    /// An ordered sequence of elements.
    List,
    /// A page descriptor whose `result` holds the element sequence.
    Paginated,
}

/// Immutable description of one remote call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MethodDescriptor {
    pub name: &'static str,
    pub params: &'static [Param],
    pub returns: ReturnType,
    pub shape: ResultShape,
}

impl MethodDescriptor {
    /// Name transmitted in the request envelope.
    pub fn wire_name(&self) -> String {
        to_camel_case(self.name)
    }

    pub fn is_array(&self) -> bool {
        self.shape != ResultShape::Single
    }

    pub fn is_paginated(&self) -> bool {
        self.shape == ResultShape::Paginated
    }

    /// Human-readable result shape, used in decode errors.
    pub fn expected_shape(&self) -> String {
        let name = self.returns.name();
        match self.shape {
            ResultShape::Single => name.to_string(),
            ResultShape::List => format!("list of {name}"),
            ResultShape::Paginated => format!("paginated list of {name}"),
        }
    }

    /// Check positional arguments against the declared parameters.
    pub fn check_args(&self, args: &[Value]) -> Result<(), String> {
        if args.len() != self.params.len() {
            return Err(format!(
                "expected {} argument(s) ({}), got {}",
                self.params.len(),
                self.param_names().join(", "),
                args.len()
            ));
        }
        for (param, arg) in self.params.iter().zip(args) {
            if !param.kind.accepts(arg) {
                return Err(format!(
                    "`{}` must be {}, got {arg}",
                    param.name,
                    param.kind.describe()
                ));
            }
        }
        Ok(())
    }

    pub fn param_names(&self) -> Vec<&'static str> {
        self.params.iter().map(|p| p.name).collect()
    }
}

/// Render an identifier in camelCase.
///
/// Accepts snake_case, kebab-case, PascalCase, SCREAMING_CASE and camelCase:
/// `get_block_height`, `GetBlockHeight` and `GET_BLOCK_HEIGHT` all become
/// `getBlockHeight`.
pub fn to_camel_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let segments = name
        .split(|c: char| c == '_' || c == '-' || c.is_whitespace())
        .filter(|s| !s.is_empty());

    for (i, segment) in segments.enumerate() {
        let shouting = !segment.chars().any(char::is_lowercase);
        let mut chars = segment.chars();
        if let Some(first) = chars.next() {
            if i == 0 {
                out.extend(first.to_lowercase());
            } else {
                out.extend(first.to_uppercase());
            }
        }
        for c in chars {
            if shouting {
                out.extend(c.to_lowercase());
            } else {
                out.push(c);
            }
        }
    }
    out
}

macro_rules! method {
    ($name:literal, [$($param:expr),*], $returns:ident, $shape:ident) => {
        MethodDescriptor {
            name: $name,
            params: &[$($param),*],
            returns: ReturnType::$returns,
            shape: ResultShape::$shape,
        }
    };
}

pub const GET_ACCOUNT: MethodDescriptor = method!("get_account", [text("address")], Account, Single);
pub const LOOK_UP_NAME: MethodDescriptor = method!("look_up_name", [text("name")], Text, Single);
pub const GET_BLOCK_HEIGHT: MethodDescriptor = method!("get_block_height", [text("chain")], Integer, Single);
pub const GET_BLOCK_TRANSACTION_COUNT_BY_HASH: MethodDescriptor =
    method!("get_block_transaction_count_by_hash", [text("blockHash")], Integer, Single);
pub const GET_BLOCK_BY_HASH: MethodDescriptor = method!("get_block_by_hash", [text("blockHash")], Block, Single);
pub const GET_RAW_BLOCK_BY_HASH: MethodDescriptor =
    method!("get_raw_block_by_hash", [text("blockHash")], Text, Single);
pub const GET_BLOCK_BY_HEIGHT: MethodDescriptor =
    method!("get_block_by_height", [text("chain"), integer("height")], Block, Single);
pub const GET_RAW_BLOCK_BY_HEIGHT: MethodDescriptor =
    method!("get_raw_block_by_height", [text("chain"), integer("height")], Text, Single);
pub const GET_TRANSACTION_BY_BLOCK_HASH_AND_INDEX: MethodDescriptor = method!(
    "get_transaction_by_block_hash_and_index",
    [text("blockHash"), integer("index")],
    Transaction,
    Single
);
pub const GET_ADDRESS_TRANSACTIONS: MethodDescriptor = method!(
    "get_address_transactions",
    [text("address"), integer("page"), integer("pageSize")],
    AccountTransactions,
    Paginated
);
pub const GET_ADDRESS_TRANSACTION_COUNT: MethodDescriptor =
    method!("get_address_transaction_count", [text("address"), text("chain")], Integer, Single);
pub const SEND_RAW_TRANSACTION: MethodDescriptor =
    method!("send_raw_transaction", [text("txData")], Text, Single);
pub const INVOKE_RAW_SCRIPT: MethodDescriptor =
    method!("invoke_raw_script", [text("chain"), text("scriptData")], Script, Single);
pub const GET_TRANSACTION: MethodDescriptor = method!("get_transaction", [text("hash")], Transaction, Single);
pub const CANCEL_TRANSACTION: MethodDescriptor = method!("cancel_transaction", [text("hash")], Text, Single);
pub const GET_CHAINS: MethodDescriptor = method!("get_chains", [], Chain, List);
pub const GET_TOKENS: MethodDescriptor = method!("get_tokens", [], Token, List);
pub const GET_TOKEN: MethodDescriptor = method!("get_token", [text("symbol")], Token, Single);
pub const GET_TOKEN_DATA: MethodDescriptor =
    method!("get_token_data", [text("symbol"), text("id")], TokenData, Single);
pub const GET_APPS: MethodDescriptor = method!("get_apps", [], App, List);
pub const GET_TOKEN_TRANSFERS: MethodDescriptor = method!(
    "get_token_transfers",
    [text("symbol"), integer("page"), integer("pageSize")],
    Transaction,
    Paginated
);
pub const GET_TOKEN_TRANSFER_COUNT: MethodDescriptor =
    method!("get_token_transfer_count", [text("symbol")], Integer, Single);
pub const GET_TOKEN_BALANCE: MethodDescriptor = method!(
    "get_token_balance",
    [text("address"), text("symbol"), text("chain")],
    Balance,
    Single
);
pub const GET_AUCTIONS_COUNT: MethodDescriptor = method!("get_auctions_count", [text("symbol")], Integer, Single);
pub const GET_AUCTIONS: MethodDescriptor = method!(
    "get_auctions",
    [text("symbol"), integer("page"), integer("pageSize")],
    Auction,
    Paginated
);
pub const GET_AUCTION: MethodDescriptor = method!("get_auction", [text("symbol"), text("id")], Auction, Single);

/// Every supported call, in the order the node documents them.
pub const CATALOGUE: &[MethodDescriptor] = &[
    GET_ACCOUNT,
    LOOK_UP_NAME,
    GET_BLOCK_HEIGHT,
    GET_BLOCK_TRANSACTION_COUNT_BY_HASH,
    GET_BLOCK_BY_HASH,
    GET_RAW_BLOCK_BY_HASH,
    GET_BLOCK_BY_HEIGHT,
    GET_RAW_BLOCK_BY_HEIGHT,
    GET_TRANSACTION_BY_BLOCK_HASH_AND_INDEX,
    GET_ADDRESS_TRANSACTIONS,
    GET_ADDRESS_TRANSACTION_COUNT,
    SEND_RAW_TRANSACTION,
    INVOKE_RAW_SCRIPT,
    GET_TRANSACTION,
    CANCEL_TRANSACTION,
    GET_CHAINS,
    GET_TOKENS,
    GET_TOKEN,
    GET_TOKEN_DATA,
    GET_APPS,
    GET_TOKEN_TRANSFERS,
    GET_TOKEN_TRANSFER_COUNT,
    GET_TOKEN_BALANCE,
    GET_AUCTIONS_COUNT,
    GET_AUCTIONS,
    GET_AUCTION,
];

/// Look up a descriptor by name in any casing.
pub fn find(name: &str) -> Option<&'static MethodDescriptor> {
    let wire = to_camel_case(name);
    CATALOGUE.iter().find(|m| m.wire_name() == wire)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashSet;

    #[test]
    fn camel_case_normalization() {
        assert_eq!(to_camel_case("get_block_height"), "getBlockHeight");
        assert_eq!(to_camel_case("GetBlockHeight"), "getBlockHeight");
        assert_eq!(to_camel_case("getBlockHeight"), "getBlockHeight");
        assert_eq!(to_camel_case("GET_BLOCK_HEIGHT"), "getBlockHeight");
        assert_eq!(to_camel_case("get-block-height"), "getBlockHeight");
        assert_eq!(to_camel_case("LookUpName"), "lookUpName");
        assert_eq!(to_camel_case(""), "");
    }

    #[test]
    fn catalogue_wire_names() {
        let names: Vec<String> = CATALOGUE.iter().map(|m| m.wire_name()).collect();
        let expected = [
            "getAccount",
            "lookUpName",
            "getBlockHeight",
            "getBlockTransactionCountByHash",
            "getBlockByHash",
            "getRawBlockByHash",
            "getBlockByHeight",
            "getRawBlockByHeight",
            "getTransactionByBlockHashAndIndex",
            "getAddressTransactions",
            "getAddressTransactionCount",
            "sendRawTransaction",
            "invokeRawScript",
            "getTransaction",
            "cancelTransaction",
            "getChains",
            "getTokens",
            "getToken",
            "getTokenData",
            "getApps",
            "getTokenTransfers",
            "getTokenTransferCount",
            "getTokenBalance",
            "getAuctionsCount",
            "getAuctions",
            "getAuction",
        ];
        assert_eq!(names, expected);

        let unique: HashSet<_> = names.iter().collect();
        assert_eq!(unique.len(), CATALOGUE.len());
    }

    #[test]
    fn paginated_methods_take_page_arguments() {
        let paginated: Vec<_> = CATALOGUE.iter().filter(|m| m.is_paginated()).collect();
        assert_eq!(paginated.len(), 3);
        for m in paginated {
            assert!(m.is_array());
            assert_eq!(&m.param_names()[1..], ["page", "pageSize"]);
        }
        assert!(GET_TOKENS.is_array());
        assert!(!GET_TOKENS.is_paginated());
        assert!(!GET_ACCOUNT.is_array());
    }

    #[test]
    fn find_accepts_any_casing() {
        assert_eq!(find("getBlockByHeight"), Some(&GET_BLOCK_BY_HEIGHT));
        assert_eq!(find("get_block_by_height"), Some(&GET_BLOCK_BY_HEIGHT));
        assert_eq!(find("GetBlockByHeight"), Some(&GET_BLOCK_BY_HEIGHT));
        assert_eq!(find("getBlockByNumber"), None);
    }

    #[test]
    fn argument_checking() {
        GET_BLOCK_BY_HEIGHT
            .check_args(&[json!("main"), json!(1)])
            .unwrap();

        let err = GET_BLOCK_BY_HEIGHT.check_args(&[json!("main")]).unwrap_err();
        assert!(err.contains("expected 2"));
        assert!(err.contains("chain, height"));

        let err = GET_BLOCK_BY_HEIGHT
            .check_args(&[json!(1), json!("main")])
            .unwrap_err();
        assert!(err.contains("`chain`"));

        assert!(GET_BLOCK_BY_HEIGHT
            .check_args(&[json!("main"), json!(-1)])
            .is_err());
        GET_CHAINS.check_args(&[]).unwrap();
    }

    #[test]
    fn expected_shape_text() {
        assert_eq!(GET_BLOCK_BY_HASH.expected_shape(), "Block");
        assert_eq!(GET_TOKENS.expected_shape(), "list of Token");
        assert_eq!(GET_AUCTIONS.expected_shape(), "paginated list of Auction");
    }

    #[test]
    fn conform_checks_schema() {
        let ok = ReturnType::Chain
            .conform(json!({ "name": "main", "address": "S1", "parentAddress": "", "height": 3 }))
            .unwrap();
        assert_eq!(ok["height"], 3);

        assert!(ReturnType::Chain.conform(json!({ "name": "main" })).is_err());
        assert!(ReturnType::Integer.conform(json!("12")).is_err());
        assert_eq!(ReturnType::Text.conform(json!("ok")).unwrap(), json!("ok"));

        let list = ReturnType::Integer.conform_list(json!([1, 2, 3])).unwrap();
        assert_eq!(list, json!([1, 2, 3]));
        assert!(ReturnType::Integer.conform_list(json!({ "a": 1 })).is_err());
    }
}
