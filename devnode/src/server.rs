use std::net::SocketAddr;
use std::sync::Arc;

use jsonrpsee::core::RpcResult;
use jsonrpsee::server::{ServerBuilder, ServerHandle};
use jsonrpsee::types::ErrorObjectOwned;
use parking_lot::RwLock;
use phantasma_rpc::{
    Account, AccountTransactions, App, Auction, Balance, Block, Chain, Paginated, Script, Token, TokenData,
    Transaction,
};

use crate::handlers::PhantasmaApiServer;
use crate::ledger::{Ledger, LedgerError};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Shared state accessible by all RPC handlers.
pub struct NodeState {
    pub ledger: Arc<RwLock<Ledger>>,
}

impl NodeState {
    pub fn new(ledger: Ledger) -> Self {
        Self {
            ledger: Arc::new(RwLock::new(ledger)),
        }
    }

    /// State seeded with [`Ledger::sample`].
    pub fn sample() -> Self {
        Self::new(Ledger::sample())
    }
}

impl Default for NodeState {
    fn default() -> Self {
        Self::sample()
    }
}

/// The development node's JSON-RPC server.
pub struct DevNode {
    addr: SocketAddr,
    state: Arc<NodeState>,
}

impl DevNode {
    pub fn new(addr: SocketAddr, state: Arc<NodeState>) -> Self {
        Self { addr, state }
    }

    /// Listen on every interface at `port`.
    pub fn on_port(port: u16, state: Arc<NodeState>) -> Self {
        Self::new(SocketAddr::from(([0, 0, 0, 0], port)), state)
    }

    /// Bind and start serving in the background.
    pub async fn spawn(self) -> Result<(SocketAddr, ServerHandle), BoxError> {
        let server = ServerBuilder::default().build(self.addr).await?;
        let rpc_impl = RpcImpl { state: self.state };

        let addr = server.local_addr()?;
        tracing::info!(%addr, "Phantasma devnode listening");

        let handle = server.start(rpc_impl.into_rpc());
        Ok((addr, handle))
    }

    /// Serve until the server is stopped.
    pub async fn start(self) -> Result<SocketAddr, BoxError> {
        let (addr, handle) = self.spawn().await?;
        handle.stopped().await;
        Ok(addr)
    }
}

fn rpc_err(err: LedgerError) -> ErrorObjectOwned {
    ErrorObjectOwned::owned(err.code(), err.to_string(), None::<()>)
}

struct RpcImpl {
    state: Arc<NodeState>,
}

impl RpcImpl {
    fn read<R>(&self, f: impl FnOnce(&Ledger) -> Result<R, LedgerError>) -> RpcResult<R> {
        let ledger = self.state.ledger.read();
        f(&*ledger).map_err(rpc_err)
    }
}

impl PhantasmaApiServer for RpcImpl {
    fn get_account(&self, address: String) -> RpcResult<Account> {
        self.read(|l| l.account(&address))
    }

    fn look_up_name(&self, name: String) -> RpcResult<String> {
        self.read(|l| l.look_up_name(&name))
    }

    fn get_block_height(&self, chain: String) -> RpcResult<u64> {
        self.read(|l| l.block_height(&chain))
    }

    fn get_block_transaction_count_by_hash(&self, block_hash: String) -> RpcResult<u64> {
        self.read(|l| Ok(l.block_by_hash(&block_hash)?.txs.len() as u64))
    }

    fn get_block_by_hash(&self, block_hash: String) -> RpcResult<Block> {
        self.read(|l| l.block_by_hash(&block_hash).cloned())
    }

    fn get_raw_block_by_hash(&self, block_hash: String) -> RpcResult<String> {
        self.read(|l| Ledger::raw_block(l.block_by_hash(&block_hash)?))
    }

    fn get_block_by_height(&self, chain: String, height: u64) -> RpcResult<Block> {
        self.read(|l| l.block_by_height(&chain, height).cloned())
    }

    fn get_raw_block_by_height(&self, chain: String, height: u64) -> RpcResult<String> {
        self.read(|l| Ledger::raw_block(l.block_by_height(&chain, height)?))
    }

    fn get_transaction_by_block_hash_and_index(&self, block_hash: String, index: u64) -> RpcResult<Transaction> {
        self.read(|l| l.transaction_by_block_and_index(&block_hash, index).cloned())
    }

    fn get_address_transactions(
        &self,
        address: String,
        page: u64,
        page_size: u64,
    ) -> RpcResult<Paginated<Vec<AccountTransactions>>> {
        self.read(|l| l.address_transactions(&address, page, page_size))
    }

    fn get_address_transaction_count(&self, address: String, chain: String) -> RpcResult<u64> {
        self.read(|l| l.address_transaction_count(&address, &chain))
    }

    fn send_raw_transaction(&self, tx_data: String) -> RpcResult<String> {
        let hash = self.state.ledger.write().send_raw_transaction(&tx_data).map_err(rpc_err)?;
        tracing::debug!(%hash, "accepted raw transaction");
        Ok(hash)
    }

    fn invoke_raw_script(&self, chain: String, script_data: String) -> RpcResult<Script> {
        self.read(|l| l.invoke_raw_script(&chain, &script_data))
    }

    fn get_transaction(&self, hash: String) -> RpcResult<Transaction> {
        self.read(|l| l.transaction(&hash).cloned())
    }

    fn cancel_transaction(&self, hash: String) -> RpcResult<String> {
        let hash = self.state.ledger.write().cancel_transaction(&hash).map_err(rpc_err)?;
        tracing::debug!(%hash, "cancelled pending transaction");
        Ok(hash)
    }

    fn get_chains(&self) -> RpcResult<Vec<Chain>> {
        self.read(|l| Ok(l.chains.clone()))
    }

    fn get_tokens(&self) -> RpcResult<Vec<Token>> {
        self.read(|l| Ok(l.tokens.clone()))
    }

    fn get_token(&self, symbol: String) -> RpcResult<Token> {
        self.read(|l| l.token(&symbol).cloned())
    }

    fn get_token_data(&self, symbol: String, token_id: String) -> RpcResult<TokenData> {
        self.read(|l| l.token_data(&symbol, &token_id).cloned())
    }

    fn get_apps(&self) -> RpcResult<Vec<App>> {
        self.read(|l| Ok(l.apps.clone()))
    }

    fn get_token_transfers(&self, symbol: String, page: u64, page_size: u64) -> RpcResult<Paginated<Vec<Transaction>>> {
        self.read(|l| l.token_transfers(&symbol, page, page_size))
    }

    fn get_token_transfer_count(&self, symbol: String) -> RpcResult<u64> {
        self.read(|l| l.token_transfer_count(&symbol))
    }

    fn get_token_balance(&self, address: String, symbol: String, chain: String) -> RpcResult<Balance> {
        self.read(|l| l.token_balance(&address, &symbol, &chain))
    }

    fn get_auctions_count(&self, symbol: String) -> RpcResult<u64> {
        self.read(|l| Ok(l.auctions_count(&symbol)))
    }

    fn get_auctions(&self, symbol: String, page: u64, page_size: u64) -> RpcResult<Paginated<Vec<Auction>>> {
        self.read(|l| l.auctions(&symbol, page, page_size))
    }

    fn get_auction(&self, symbol: String, token_id: String) -> RpcResult<Auction> {
        self.read(|l| l.auction(&symbol, &token_id).cloned())
    }
}
