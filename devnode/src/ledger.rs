use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use phantasma_rpc::{
    Account, AccountTransactions, App, Auction, Balance, Block, Chain, Event, Paginated, Script,
    Token, TokenData, TokenMetadata, Transaction,
};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;

/// Largest page a paginated query will return.
pub const MAX_PAGE_SIZE: u64 = 100;

/// Name reported for addresses without a registered name.
pub const ANONYMOUS: &str = "anonymous";

pub const MAIN_CHAIN: &str = "S3dP2jjf1jUG9nethZBWbnu9a6dFqB7KveTWU7znis6jpDy";
pub const APPS_CHAIN: &str = "S3dApps7mU6Jd1y3b2wLnvRjYdVBQGYZRwgtJGa1u7WG1Ye";
pub const GENESIS_ADDRESS: &str = "P2KEYzWsbrMbPNtW1tBzzDKeYxYi4hjzpx4EfiyRyaoLk";
pub const ALICE_ADDRESS: &str = "P2K6Sm1bUYGsFkxuzHPhia1AbANZaHBJV54RgtQi5q8oK";

const TRANSFER_EVENTS: [&str; 3] = ["TokenSend", "TokenReceive", "TokenMint"];

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("chain not found: {0}")]
    UnknownChain(String),

    #[error("block not found: {0}")]
    UnknownBlock(String),

    #[error("transaction not found: {0}")]
    UnknownTransaction(String),

    #[error("name not registered: {0}")]
    UnknownName(String),

    #[error("token not found: {0}")]
    UnknownToken(String),

    #[error("token data not found: {symbol} #{id}")]
    UnknownTokenData { symbol: String, id: String },

    #[error("auction not found: {symbol} #{id}")]
    UnknownAuction { symbol: String, id: String },

    #[error("no {symbol} balance on chain {chain} for {address}")]
    NoBalance {
        address: String,
        symbol: String,
        chain: String,
    },

    #[error("invalid parameter: {0}")]
    InvalidParams(String),

    #[error("block {block} references unknown chain {chain}")]
    DanglingBlock { block: String, chain: String },

    #[error("chain {chain} declares height {declared} but its last block is {actual}")]
    HeightMismatch {
        chain: String,
        declared: u64,
        actual: u64,
    },

    #[error("duplicate transaction hash {0}")]
    DuplicateTransaction(String),

    #[error("transaction {0} does not point back at its block")]
    MisplacedTransaction(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl LedgerError {
    /// JSON-RPC error code reported to clients.
    pub fn code(&self) -> i32 {
        match self {
            LedgerError::InvalidParams(_) => -32602,
            LedgerError::Io(_) | LedgerError::Json(_) => -32603,
            _ => -32000,
        }
    }
}

/// A non-fungible token instance keyed by its symbol.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NftEntry {
    pub symbol: String,
    pub data: TokenData,
}

/// In-memory chain state served by the development node.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ledger {
    pub chains: Vec<Chain>,
    pub blocks: Vec<Block>,
    pub accounts: Vec<Account>,
    pub tokens: Vec<Token>,
    #[serde(default)]
    pub nfts: Vec<NftEntry>,
    #[serde(default)]
    pub apps: Vec<App>,
    #[serde(default)]
    pub auctions: Vec<Auction>,
    /// Broadcast but not yet included transactions, hash to raw hex.
    #[serde(default)]
    pub pending: BTreeMap<String, String>,
}

impl Ledger {
    /// Load a ledger fixture from a JSON file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, LedgerError> {
        let contents = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }

    /// Save the ledger to a JSON file.
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), LedgerError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Check the fixture is internally consistent.
    pub fn validate(&self) -> Result<(), LedgerError> {
        let chain_addresses: HashSet<&str> = self.chains.iter().map(|c| c.address.as_str()).collect();
        let mut seen = HashSet::new();

        for block in &self.blocks {
            if !chain_addresses.contains(block.chain_address.as_str()) {
                return Err(LedgerError::DanglingBlock {
                    block: block.hash.clone(),
                    chain: block.chain_address.clone(),
                });
            }
            for tx in &block.txs {
                if !seen.insert(tx.hash.as_str()) {
                    return Err(LedgerError::DuplicateTransaction(tx.hash.clone()));
                }
                if tx.block_hash != block.hash || tx.block_height != block.height {
                    return Err(LedgerError::MisplacedTransaction(tx.hash.clone()));
                }
            }
        }

        for chain in &self.chains {
            let last = self
                .blocks
                .iter()
                .filter(|b| b.chain_address == chain.address)
                .map(|b| b.height)
                .max();
            if let Some(actual) = last {
                if actual != chain.height {
                    return Err(LedgerError::HeightMismatch {
                        chain: chain.name.clone(),
                        declared: chain.height,
                        actual,
                    });
                }
            }
        }

        Ok(())
    }

    /// Find a chain by name or address.
    pub fn chain(&self, chain: &str) -> Result<&Chain, LedgerError> {
        self.chains
            .iter()
            .find(|c| c.name == chain || c.address == chain)
            .ok_or_else(|| LedgerError::UnknownChain(chain.to_string()))
    }

    /// Account for `address`; unknown addresses are empty and anonymous.
    pub fn account(&self, address: &str) -> Result<Account, LedgerError> {
        if address.trim().is_empty() {
            return Err(LedgerError::InvalidParams("address must not be empty".into()));
        }
        Ok(self
            .accounts
            .iter()
            .find(|a| a.address == address)
            .cloned()
            .unwrap_or_else(|| Account {
                address: address.to_string(),
                name: ANONYMOUS.to_string(),
                balances: Vec::new(),
            }))
    }

    /// Address registered under `name`.
    pub fn look_up_name(&self, name: &str) -> Result<String, LedgerError> {
        self.accounts
            .iter()
            .find(|a| a.name == name && a.name != ANONYMOUS)
            .map(|a| a.address.clone())
            .ok_or_else(|| LedgerError::UnknownName(name.to_string()))
    }

    /// Current height of a chain.
    pub fn block_height(&self, chain: &str) -> Result<u64, LedgerError> {
        Ok(self.chain(chain)?.height)
    }

    /// Find a block by hash.
    pub fn block_by_hash(&self, hash: &str) -> Result<&Block, LedgerError> {
        self.blocks
            .iter()
            .find(|b| b.hash == hash)
            .ok_or_else(|| LedgerError::UnknownBlock(hash.to_string()))
    }

    /// Find the block at `height` on a chain.
    pub fn block_by_height(&self, chain: &str, height: u64) -> Result<&Block, LedgerError> {
        let chain = self.chain(chain)?;
        self.blocks
            .iter()
            .find(|b| b.chain_address == chain.address && b.height == height)
            .ok_or_else(|| LedgerError::UnknownBlock(format!("{}@{height}", chain.name)))
    }

    /// Serialized block, hex encoded.
    pub fn raw_block(block: &Block) -> Result<String, LedgerError> {
        Ok(hex::encode(serde_json::to_vec(block)?))
    }

    /// Every included transaction, in block order.
    pub fn transactions(&self) -> impl Iterator<Item = &Transaction> {
        self.blocks.iter().flat_map(|b| b.txs.iter())
    }

    /// Find an included transaction by hash.
    pub fn transaction(&self, hash: &str) -> Result<&Transaction, LedgerError> {
        self.transactions()
            .find(|tx| tx.hash == hash)
            .ok_or_else(|| LedgerError::UnknownTransaction(hash.to_string()))
    }

    /// Transaction at `index` inside a block.
    pub fn transaction_by_block_and_index(&self, block_hash: &str, index: u64) -> Result<&Transaction, LedgerError> {
        let block = self.block_by_hash(block_hash)?;
        usize::try_from(index)
            .ok()
            .and_then(|i| block.txs.get(i))
            .ok_or_else(|| LedgerError::UnknownTransaction(format!("{block_hash}#{index}")))
    }

    /// One page of the transactions touching `address`.
    pub fn address_transactions(
        &self,
        address: &str,
        page: u64,
        page_size: u64,
    ) -> Result<Paginated<Vec<AccountTransactions>>, LedgerError> {
        let txs: Vec<Transaction> = self.transactions().filter(|tx| tx.involves(address)).cloned().collect();
        let page = paginate(&txs, page, page_size)?;
        Ok(page.map(|txs| {
            vec![AccountTransactions {
                address: address.to_string(),
                txs,
            }]
        }))
    }

    /// Number of transactions touching `address` on a chain.
    pub fn address_transaction_count(&self, address: &str, chain: &str) -> Result<u64, LedgerError> {
        let chain = self.chain(chain)?;
        Ok(self
            .transactions()
            .filter(|tx| tx.chain_address == chain.address && tx.involves(address))
            .count() as u64)
    }

    /// Queue a raw transaction; returns its hash.
    pub fn send_raw_transaction(&mut self, tx_data: &str) -> Result<String, LedgerError> {
        let bytes = decode_hex("txData", tx_data)?;
        let hash = hex::encode_upper(Sha256::digest(&bytes));
        self.pending.insert(hash.clone(), tx_data.to_string());
        Ok(hash)
    }

    /// Evaluate a script read-only. The development node has no VM, so every
    /// well-formed script on a known chain yields an empty result.
    pub fn invoke_raw_script(&self, chain: &str, script_data: &str) -> Result<Script, LedgerError> {
        self.chain(chain)?;
        decode_hex("scriptData", script_data)?;
        Ok(Script {
            events: Vec::new(),
            result: String::new(),
        })
    }

    /// Drop a pending transaction; returns its hash.
    pub fn cancel_transaction(&mut self, hash: &str) -> Result<String, LedgerError> {
        self.pending
            .remove(hash)
            .map(|_| hash.to_string())
            .ok_or_else(|| LedgerError::UnknownTransaction(hash.to_string()))
    }

    /// Find a token by symbol, ignoring case.
    pub fn token(&self, symbol: &str) -> Result<&Token, LedgerError> {
        self.tokens
            .iter()
            .find(|t| t.symbol.eq_ignore_ascii_case(symbol))
            .ok_or_else(|| LedgerError::UnknownToken(symbol.to_string()))
    }

    /// Find one NFT instance of a token.
    pub fn token_data(&self, symbol: &str, id: &str) -> Result<&TokenData, LedgerError> {
        let token = self.token(symbol)?;
        self.nfts
            .iter()
            .find(|n| n.symbol == token.symbol && n.data.id == id)
            .map(|n| &n.data)
            .ok_or_else(|| LedgerError::UnknownTokenData {
                symbol: token.symbol.clone(),
                id: id.to_string(),
            })
    }

    fn transfers(&self, symbol: &str) -> Result<Vec<Transaction>, LedgerError> {
        let token = self.token(symbol)?;
        Ok(self
            .transactions()
            .filter(|tx| {
                tx.events
                    .iter()
                    .any(|e| TRANSFER_EVENTS.contains(&e.kind.as_str()) && e.data == token.symbol)
            })
            .cloned()
            .collect())
    }

    /// One page of the transactions moving a token.
    pub fn token_transfers(
        &self,
        symbol: &str,
        page: u64,
        page_size: u64,
    ) -> Result<Paginated<Vec<Transaction>>, LedgerError> {
        paginate(&self.transfers(symbol)?, page, page_size)
    }

    /// Number of transactions moving a token.
    pub fn token_transfer_count(&self, symbol: &str) -> Result<u64, LedgerError> {
        Ok(self.transfers(symbol)?.len() as u64)
    }

    /// Balance of one token on a chain for `address`.
    pub fn token_balance(&self, address: &str, symbol: &str, chain: &str) -> Result<Balance, LedgerError> {
        let token = self.token(symbol)?;
        let chain = self.chain(chain)?;
        self.account(address)?
            .balances
            .into_iter()
            .find(|b| b.symbol == token.symbol && b.chain == chain.name)
            .ok_or_else(|| LedgerError::NoBalance {
                address: address.to_string(),
                symbol: token.symbol.clone(),
                chain: chain.name.clone(),
            })
    }

    fn auctions_of(&self, symbol: &str) -> Vec<Auction> {
        self.auctions
            .iter()
            .filter(|a| symbol.is_empty() || a.base_symbol.eq_ignore_ascii_case(symbol))
            .cloned()
            .collect()
    }

    /// Active auctions for `symbol`; an empty symbol counts every auction.
    pub fn auctions_count(&self, symbol: &str) -> u64 {
        self.auctions_of(symbol).len() as u64
    }

    /// One page of active auctions for `symbol`.
    pub fn auctions(&self, symbol: &str, page: u64, page_size: u64) -> Result<Paginated<Vec<Auction>>, LedgerError> {
        paginate(&self.auctions_of(symbol), page, page_size)
    }

    /// Find the auction for one token id.
    pub fn auction(&self, symbol: &str, id: &str) -> Result<&Auction, LedgerError> {
        self.auctions
            .iter()
            .find(|a| a.base_symbol.eq_ignore_ascii_case(symbol) && a.token_id == id)
            .ok_or_else(|| LedgerError::UnknownAuction {
                symbol: symbol.to_string(),
                id: id.to_string(),
            })
    }

    /// A small two-chain network with three blocks, three tokens and a
    /// couple of NFT auctions.
    pub fn sample() -> Self {
        let chains = vec![
            Chain {
                name: "main".into(),
                address: MAIN_CHAIN.into(),
                parent_address: String::new(),
                height: 3,
            },
            Chain {
                name: "apps".into(),
                address: APPS_CHAIN.into(),
                parent_address: MAIN_CHAIN.into(),
                height: 0,
            },
        ];

        let blocks = build_blocks(
            MAIN_CHAIN,
            vec![
                vec![vec![event(GENESIS_ADDRESS, "TokenMint", "SOUL"), event(GENESIS_ADDRESS, "TokenMint", "KCAL")]],
                vec![vec![
                    event(GENESIS_ADDRESS, "TokenSend", "SOUL"),
                    event(ALICE_ADDRESS, "TokenReceive", "SOUL"),
                ]],
                vec![
                    vec![
                        event(ALICE_ADDRESS, "TokenSend", "KCAL"),
                        event(GENESIS_ADDRESS, "TokenReceive", "KCAL"),
                    ],
                    vec![event(ALICE_ADDRESS, "TokenMint", "CROWN")],
                ],
            ],
        );

        let accounts = vec![
            Account {
                address: GENESIS_ADDRESS.into(),
                name: "genesis".into(),
                balances: vec![
                    balance("main", "SOUL", 8, "9000000000000000"),
                    balance("main", "KCAL", 10, "250000000000"),
                ],
            },
            Account {
                address: ALICE_ADDRESS.into(),
                name: "alice".into(),
                balances: vec![
                    balance("main", "SOUL", 8, "100000000000"),
                    Balance {
                        chain: "main".into(),
                        amount: "2".into(),
                        symbol: "CROWN".into(),
                        decimals: 0,
                        ids: vec!["1".into(), "2".into()],
                    },
                ],
            },
        ];

        let tokens = vec![
            token("SOUL", "Phantasma Stake", 8, "91136374", "Transferable, Fungible, Finite, Divisible, Stakable"),
            token("KCAL", "Phantasma Energy", 10, "0", "Transferable, Fungible, Divisible, Fuel, Burnable"),
            token("CROWN", "Phantasma Crown", 0, "0", "Transferable, Burnable"),
        ];

        let nfts = ["1", "2"]
            .iter()
            .map(|id| NftEntry {
                symbol: "CROWN".into(),
                data: TokenData {
                    id: (*id).into(),
                    chain_address: MAIN_CHAIN.into(),
                    owner_address: ALICE_ADDRESS.into(),
                    ram: String::new(),
                    rom: hex::encode(format!("crown-{id}")),
                    for_sale: true,
                },
            })
            .collect();

        let apps = vec![
            App {
                id: "nachomen".into(),
                title: "Nacho Men".into(),
                url: "https://nacho.men".into(),
                description: "Luchador fighting game".into(),
                icon: "nachomen.png".into(),
            },
            App {
                id: "market".into(),
                title: "Crown Market".into(),
                url: "https://market.example.org".into(),
                description: "NFT auctions".into(),
                icon: "market.png".into(),
            },
        ];

        let auctions = ["1", "2"]
            .iter()
            .enumerate()
            .map(|(i, id)| Auction {
                creator_address: ALICE_ADDRESS.into(),
                start_date: 1_600_000_000,
                end_date: 1_600_086_400,
                base_symbol: "CROWN".into(),
                quote_symbol: "SOUL".into(),
                token_id: (*id).into(),
                price: ((i as u64 + 1) * 100_000_000).to_string(),
            })
            .collect();

        Ledger {
            chains,
            blocks,
            accounts,
            tokens,
            nfts,
            apps,
            auctions,
            pending: BTreeMap::new(),
        }
    }
}

/// Slice `items` into the 1-based `page` of `page_size` entries.
///
/// Page sizes are clamped to `1..=MAX_PAGE_SIZE`; pages past the end are empty.
pub fn paginate<T: Clone>(items: &[T], page: u64, page_size: u64) -> Result<Paginated<Vec<T>>, LedgerError> {
    if page == 0 {
        return Err(LedgerError::InvalidParams("page numbers start at 1".into()));
    }
    let page_size = page_size.clamp(1, MAX_PAGE_SIZE);
    let total = items.len() as u64;
    let start = usize::try_from((page - 1).saturating_mul(page_size)).unwrap_or(usize::MAX);
    let result = items
        .iter()
        .skip(start)
        .take(page_size as usize)
        .cloned()
        .collect();

    Ok(Paginated {
        page,
        page_size,
        total,
        total_pages: total.div_ceil(page_size),
        result,
    })
}

fn decode_hex(param: &str, data: &str) -> Result<Vec<u8>, LedgerError> {
    let bytes = hex::decode(data).map_err(|e| LedgerError::InvalidParams(format!("{param}: {e}")))?;
    if bytes.is_empty() {
        return Err(LedgerError::InvalidParams(format!("{param} must not be empty")));
    }
    Ok(bytes)
}

fn digest_hex(input: &str) -> String {
    hex::encode_upper(Sha256::digest(input.as_bytes()))
}

fn event(address: &str, kind: &str, data: &str) -> Event {
    Event {
        address: address.into(),
        kind: kind.into(),
        data: data.into(),
    }
}

fn balance(chain: &str, symbol: &str, decimals: u64, amount: &str) -> Balance {
    Balance {
        chain: chain.into(),
        amount: amount.into(),
        symbol: symbol.into(),
        decimals,
        ids: Vec::new(),
    }
}

fn token(symbol: &str, name: &str, decimals: u64, max_supply: &str, flags: &str) -> Token {
    Token {
        symbol: symbol.into(),
        name: name.into(),
        decimals,
        current_supply: "0".into(),
        max_supply: max_supply.into(),
        owner_address: GENESIS_ADDRESS.into(),
        metadata_list: vec![TokenMetadata {
            key: "description".into(),
            value: name.into(),
        }],
        flags: flags.into(),
    }
}

/// Chain `blocks` (each a list of transactions, each a list of events) onto
/// `chain`, starting at height 1.
fn build_blocks(chain: &str, blocks: Vec<Vec<Vec<Event>>>) -> Vec<Block> {
    let tip = blocks.len() as u64;
    let mut previous_hash = "0".repeat(64);
    let mut out = Vec::with_capacity(blocks.len());

    for (i, txs) in blocks.into_iter().enumerate() {
        let height = i as u64 + 1;
        let hash = digest_hex(&format!("{chain}:{height}"));
        let timestamp = 1_550_000_000 + height * 60;
        let txs = txs
            .into_iter()
            .enumerate()
            .map(|(index, events)| Transaction {
                hash: digest_hex(&format!("{hash}:{index}")),
                chain_address: chain.into(),
                timestamp,
                confirmations: tip - height + 1,
                block_height: height,
                block_hash: hash.clone(),
                script: hex::encode(format!("script-{height}-{index}")),
                events,
                result: String::new(),
            })
            .collect();

        out.push(Block {
            hash: hash.clone(),
            previous_hash: previous_hash.clone(),
            timestamp,
            height,
            chain_address: chain.into(),
            payload: String::new(),
            txs,
            validator_address: GENESIS_ADDRESS.into(),
            reward: "0".into(),
        });
        previous_hash = hash;
    }
    out
}
