//! Typed wrappers, one per catalogue method.

use serde_json::Value;

use crate::client::PhantasmaClient;
use crate::envelope::Paginated;
use crate::error::ClientError;
use crate::methods;
use crate::transport::Transport;
use crate::types::*;

type Result<T> = std::result::Result<T, ClientError>;

fn page_args(key: &str, page: u64, page_size: u64) -> Vec<Value> {
    vec![key.into(), page.into(), page_size.into()]
}

impl<T: Transport> PhantasmaClient<T> {
    /// Returns the account name and balances of the given address.
    pub async fn get_account(&self, address: &str) -> Result<Account> {
        self.call(&methods::GET_ACCOUNT, vec![address.into()]).await
    }

    /// Returns the address that owns a given name.
    pub async fn look_up_name(&self, name: &str) -> Result<String> {
        self.call(&methods::LOOK_UP_NAME, vec![name.into()]).await
    }

    /// Returns the height of a chain.
    pub async fn get_block_height(&self, chain: &str) -> Result<u64> {
        self.call(&methods::GET_BLOCK_HEIGHT, vec![chain.into()]).await
    }

    /// Returns the number of transactions in the block with the given hash.
    pub async fn get_block_transaction_count_by_hash(&self, block_hash: &str) -> Result<u64> {
        self.call(&methods::GET_BLOCK_TRANSACTION_COUNT_BY_HASH, vec![block_hash.into()])
            .await
    }

    /// Returns the block with the given hash.
    pub async fn get_block_by_hash(&self, block_hash: &str) -> Result<Block> {
        self.call(&methods::GET_BLOCK_BY_HASH, vec![block_hash.into()]).await
    }

    /// Returns the serialized block, hex encoded.
    pub async fn get_raw_block_by_hash(&self, block_hash: &str) -> Result<String> {
        self.call(&methods::GET_RAW_BLOCK_BY_HASH, vec![block_hash.into()]).await
    }

    /// Returns the block at `height` on `chain`.
    pub async fn get_block_by_height(&self, chain: &str, height: u64) -> Result<Block> {
        self.call(&methods::GET_BLOCK_BY_HEIGHT, vec![chain.into(), height.into()])
            .await
    }

    /// Returns the serialized block at `height`, hex encoded.
    pub async fn get_raw_block_by_height(&self, chain: &str, height: u64) -> Result<String> {
        self.call(&methods::GET_RAW_BLOCK_BY_HEIGHT, vec![chain.into(), height.into()])
            .await
    }

    /// Returns the transaction at `index` inside a block.
    pub async fn get_transaction_by_block_hash_and_index(
        &self,
        block_hash: &str,
        index: u64,
    ) -> Result<Transaction> {
        self.call(
            &methods::GET_TRANSACTION_BY_BLOCK_HASH_AND_INDEX,
            vec![block_hash.into(), index.into()],
        )
        .await
    }

    /// One page of the transactions of an address. Page metadata is dropped.
    pub async fn get_address_transactions(
        &self,
        address: &str,
        page: u64,
        page_size: u64,
    ) -> Result<Vec<AccountTransactions>> {
        self.call(&methods::GET_ADDRESS_TRANSACTIONS, page_args(address, page, page_size))
            .await
    }

    /// Like [`PhantasmaClient::get_address_transactions`], with page metadata.
    pub async fn get_address_transactions_page(
        &self,
        address: &str,
        page: u64,
        page_size: u64,
    ) -> Result<Paginated<Vec<AccountTransactions>>> {
        self.call_page(&methods::GET_ADDRESS_TRANSACTIONS, page_args(address, page, page_size))
            .await
    }

    /// Number of transactions of an address on a chain.
    pub async fn get_address_transaction_count(&self, address: &str, chain: &str) -> Result<u64> {
        self.call(&methods::GET_ADDRESS_TRANSACTION_COUNT, vec![address.into(), chain.into()])
            .await
    }

    /// Broadcast a signed transaction (hex). Returns the transaction hash.
    pub async fn send_raw_transaction(&self, tx_data: &str) -> Result<String> {
        self.call(&methods::SEND_RAW_TRANSACTION, vec![tx_data.into()]).await
    }

    /// Run a script (hex) against current state without committing changes.
    pub async fn invoke_raw_script(&self, chain: &str, script_data: &str) -> Result<Script> {
        self.call(&methods::INVOKE_RAW_SCRIPT, vec![chain.into(), script_data.into()])
            .await
    }

    /// Returns a transaction by hash.
    pub async fn get_transaction(&self, hash: &str) -> Result<Transaction> {
        self.call(&methods::GET_TRANSACTION, vec![hash.into()]).await
    }

    /// Remove a pending transaction from the mempool.
    pub async fn cancel_transaction(&self, hash: &str) -> Result<String> {
        self.call(&methods::CANCEL_TRANSACTION, vec![hash.into()]).await
    }

    /// Lists every chain of the network.
    pub async fn get_chains(&self) -> Result<Vec<Chain>> {
        self.call(&methods::GET_CHAINS, vec![]).await
    }

    /// Lists every token deployed on the network.
    pub async fn get_tokens(&self) -> Result<Vec<Token>> {
        self.call(&methods::GET_TOKENS, vec![]).await
    }

    /// Returns one token by symbol.
    pub async fn get_token(&self, symbol: &str) -> Result<Token> {
        self.call(&methods::GET_TOKEN, vec![symbol.into()]).await
    }

    /// Data of a non-fungible token.
    pub async fn get_token_data(&self, symbol: &str, id: &str) -> Result<TokenData> {
        self.call(&methods::GET_TOKEN_DATA, vec![symbol.into(), id.into()])
            .await
    }

    /// Lists the registered apps.
    pub async fn get_apps(&self) -> Result<Vec<App>> {
        self.call(&methods::GET_APPS, vec![]).await
    }

    /// One page of the transfers of a token. Page metadata is dropped.
    pub async fn get_token_transfers(
        &self,
        symbol: &str,
        page: u64,
        page_size: u64,
    ) -> Result<Vec<Transaction>> {
        self.call(&methods::GET_TOKEN_TRANSFERS, page_args(symbol, page, page_size))
            .await
    }

    /// Like [`Self::get_token_transfers`], keeping page metadata.
    pub async fn get_token_transfers_page(
        &self,
        symbol: &str,
        page: u64,
        page_size: u64,
    ) -> Result<Paginated<Vec<Transaction>>> {
        self.call_page(&methods::GET_TOKEN_TRANSFERS, page_args(symbol, page, page_size))
            .await
    }

    /// Number of transfers recorded for a token.
    pub async fn get_token_transfer_count(&self, symbol: &str) -> Result<u64> {
        self.call(&methods::GET_TOKEN_TRANSFER_COUNT, vec![symbol.into()]).await
    }

    /// Balance of one token on one chain for an address.
    pub async fn get_token_balance(&self, address: &str, symbol: &str, chain: &str) -> Result<Balance> {
        self.call(
            &methods::GET_TOKEN_BALANCE,
            vec![address.into(), symbol.into(), chain.into()],
        )
        .await
    }

    /// Number of active auctions for a token.
    pub async fn get_auctions_count(&self, symbol: &str) -> Result<u64> {
        self.call(&methods::GET_AUCTIONS_COUNT, vec![symbol.into()]).await
    }

    /// One page of active auctions. Page metadata is dropped.
    pub async fn get_auctions(&self, symbol: &str, page: u64, page_size: u64) -> Result<Vec<Auction>> {
        self.call(&methods::GET_AUCTIONS, page_args(symbol, page, page_size))
            .await
    }

    /// Like [`Self::get_auctions`], keeping page metadata.
    pub async fn get_auctions_page(
        &self,
        symbol: &str,
        page: u64,
        page_size: u64,
    ) -> Result<Paginated<Vec<Auction>>> {
        self.call_page(&methods::GET_AUCTIONS, page_args(symbol, page, page_size))
            .await
    }

    /// Returns the auction for one token id.
    pub async fn get_auction(&self, symbol: &str, id: &str) -> Result<Auction> {
        self.call(&methods::GET_AUCTION, vec![symbol.into(), id.into()])
            .await
    }

    /// Whether the node answers at all.
    pub async fn is_connected(&self) -> bool {
        self.get_chains().await.is_ok()
    }
}
