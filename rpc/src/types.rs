//! Data-transfer objects returned by the Phantasma node API.
//!
//! Field names follow the node's camelCase wire format. Every record rejects
//! unknown fields and requires all declared ones, so a protocol-version skew
//! surfaces as a decode error instead of a silently truncated value.
//! Big-number quantities (amounts, supplies, prices) stay strings.

use serde::{Deserialize, Serialize};

/// Balance of one token on one chain.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Balance {
    pub chain: String,
    pub amount: String,
    pub symbol: String,
    pub decimals: u64,
    /// Owned NFT ids, empty for fungible tokens.
    pub ids: Vec<String>,
}

/// Response for `getAccount`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Account {
    pub address: String,
    /// Registered name, `"anonymous"` when none is registered.
    pub name: String,
    pub balances: Vec<Balance>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Chain {
    pub name: String,
    pub address: String,
    pub parent_address: String,
    pub height: u64,
}

/// A dapp registered on the chain.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct App {
    pub id: String,
    pub title: String,
    pub url: String,
    pub description: String,
    pub icon: String,
}

/// An event emitted by a transaction or a script invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Event {
    pub address: String,
    pub kind: String,
    pub data: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Transaction {
    pub hash: String,
    pub chain_address: String,
    pub timestamp: u64,
    pub confirmations: u64,
    pub block_height: u64,
    pub block_hash: String,
    pub script: String,
    pub events: Vec<Event>,
    pub result: String,
}

impl Transaction {
    /// True if any event of this transaction references `address`.
    pub fn involves(&self, address: &str) -> bool {
        self.events.iter().any(|e| e.address == address)
    }
}

/// Transactions touching one address, as returned by `getAddressTransactions`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct AccountTransactions {
    pub address: String,
    pub txs: Vec<Transaction>,
}

/// A block with its transactions embedded in full.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Block {
    pub hash: String,
    pub previous_hash: String,
    pub timestamp: u64,
    pub height: u64,
    pub chain_address: String,
    pub payload: String,
    pub txs: Vec<Transaction>,
    pub validator_address: String,
    pub reward: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct TokenMetadata {
    pub key: String,
    pub value: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Token {
    pub symbol: String,
    pub name: String,
    pub decimals: u64,
    pub current_supply: String,
    pub max_supply: String,
    pub owner_address: String,
    pub metadata_list: Vec<TokenMetadata>,
    /// Comma-separated token flags, e.g. `"Transferable, Fungible"`.
    pub flags: String,
}

impl Token {
    /// Whether the flag list contains `flag` (case-insensitive).
    pub fn has_flag(&self, flag: &str) -> bool {
        self.flags
            .split(',')
            .any(|f| f.trim().eq_ignore_ascii_case(flag))
    }
}

/// Data of a single non-fungible token, RAM/ROM in hex.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct TokenData {
    #[serde(rename = "ID", alias = "iD")]
    pub id: String,
    pub chain_address: String,
    pub owner_address: String,
    pub ram: String,
    pub rom: String,
    pub for_sale: bool,
}

/// Outcome of a raw transaction broadcast.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SendRawTx {
    pub hash: String,
    pub error: String,
}

/// A market auction for a non-fungible token.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Auction {
    pub creator_address: String,
    pub start_date: u64,
    pub end_date: u64,
    pub base_symbol: String,
    pub quote_symbol: String,
    pub token_id: String,
    pub price: String,
}

/// Result of a read-only script invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Script {
    pub events: Vec<Event>,
    pub result: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_tx(hash: &str) -> serde_json::Value {
        json!({
            "hash": hash,
            "chainAddress": "main",
            "timestamp": 100,
            "confirmations": 3,
            "blockHeight": 1,
            "blockHash": "0xabc",
            "script": "00",
            "events": [{ "address": "P2K1", "kind": "TokenSend", "data": "SOUL" }],
            "result": ""
        })
    }

    #[test]
    fn block_decodes_with_embedded_transactions() {
        let raw = json!({
            "hash": "0xabc",
            "previousHash": "0x000",
            "timestamp": 100,
            "height": 1,
            "chainAddress": "main",
            "payload": "",
            "txs": [sample_tx("0x1")],
            "validatorAddress": "0xval",
            "reward": "0"
        });
        let block: Block = serde_json::from_value(raw).unwrap();
        assert_eq!(block.height, 1);
        assert_eq!(block.txs.len(), 1);
        assert_eq!(block.txs[0].events[0].kind, "TokenSend");
        assert!(block.txs[0].involves("P2K1"));
        assert!(!block.txs[0].involves("P2K2"));
    }

    #[test]
    fn missing_field_is_rejected() {
        let raw = json!({ "address": "P2K1", "name": "anonymous" });
        let err = serde_json::from_value::<Account>(raw).unwrap_err();
        assert!(err.to_string().contains("balances"));
    }

    #[test]
    fn unknown_field_is_rejected() {
        let raw = json!({ "key": "a", "value": "b", "extra": 1 });
        assert!(serde_json::from_value::<TokenMetadata>(raw).is_err());
    }

    #[test]
    fn null_string_is_rejected() {
        let raw = json!({ "hash": null, "error": "" });
        assert!(serde_json::from_value::<SendRawTx>(raw).is_err());
    }

    #[test]
    fn token_data_uses_upper_case_id_on_the_wire() {
        let data = TokenData {
            id: "42".into(),
            for_sale: true,
            ..TokenData::default()
        };
        let value = serde_json::to_value(&data).unwrap();
        assert_eq!(value["ID"], "42");
        assert_eq!(value["forSale"], true);

        let legacy = json!({
            "iD": "7",
            "chainAddress": "main",
            "ownerAddress": "P2K1",
            "ram": "",
            "rom": "",
            "forSale": false
        });
        let decoded: TokenData = serde_json::from_value(legacy).unwrap();
        assert_eq!(decoded.id, "7");
    }

    #[test]
    fn token_flags() {
        let token = Token {
            flags: "Transferable, Fungible,Finite".into(),
            ..Token::default()
        };
        assert!(token.has_flag("fungible"));
        assert!(token.has_flag("Finite"));
        assert!(!token.has_flag("Burnable"));
    }
}
