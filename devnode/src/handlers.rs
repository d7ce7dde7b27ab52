use jsonrpsee::core::RpcResult;
use jsonrpsee::proc_macros::rpc;
use phantasma_rpc::{
    Account, AccountTransactions, App, Auction, Balance, Block, Chain, Paginated, Script, Token, TokenData,
    Transaction,
};

/// Node-side view of the Phantasma JSON-RPC API.
///
/// Method names are the camelCase wire names; parameters are positional.
#[rpc(server)]
pub trait PhantasmaApi {
    #[method(name = "getAccount")]
    fn get_account(&self, address: String) -> RpcResult<Account>;

    #[method(name = "lookUpName")]
    fn look_up_name(&self, name: String) -> RpcResult<String>;

    #[method(name = "getBlockHeight")]
    fn get_block_height(&self, chain: String) -> RpcResult<u64>;

    #[method(name = "getBlockTransactionCountByHash")]
    fn get_block_transaction_count_by_hash(&self, block_hash: String) -> RpcResult<u64>;

    #[method(name = "getBlockByHash")]
    fn get_block_by_hash(&self, block_hash: String) -> RpcResult<Block>;

    #[method(name = "getRawBlockByHash")]
    fn get_raw_block_by_hash(&self, block_hash: String) -> RpcResult<String>;

    #[method(name = "getBlockByHeight")]
    fn get_block_by_height(&self, chain: String, height: u64) -> RpcResult<Block>;

    #[method(name = "getRawBlockByHeight")]
    fn get_raw_block_by_height(&self, chain: String, height: u64) -> RpcResult<String>;

    #[method(name = "getTransactionByBlockHashAndIndex")]
    fn get_transaction_by_block_hash_and_index(&self, block_hash: String, index: u64) -> RpcResult<Transaction>;

    /// Paginated; the page holds a single entry for the queried address.
    #[method(name = "getAddressTransactions")]
    fn get_address_transactions(
        &self,
        address: String,
        page: u64,
        page_size: u64,
    ) -> RpcResult<Paginated<Vec<AccountTransactions>>>;

    #[method(name = "getAddressTransactionCount")]
    fn get_address_transaction_count(&self, address: String, chain: String) -> RpcResult<u64>;

    /// Queue a hex encoded transaction and return its hash.
    #[method(name = "sendRawTransaction")]
    fn send_raw_transaction(&self, tx_data: String) -> RpcResult<String>;

    #[method(name = "invokeRawScript")]
    fn invoke_raw_script(&self, chain: String, script_data: String) -> RpcResult<Script>;

    #[method(name = "getTransaction")]
    fn get_transaction(&self, hash: String) -> RpcResult<Transaction>;

    /// Drop a pending transaction.
    #[method(name = "cancelTransaction")]
    fn cancel_transaction(&self, hash: String) -> RpcResult<String>;

    #[method(name = "getChains")]
    fn get_chains(&self) -> RpcResult<Vec<Chain>>;

    #[method(name = "getTokens")]
    fn get_tokens(&self) -> RpcResult<Vec<Token>>;

    #[method(name = "getToken")]
    fn get_token(&self, symbol: String) -> RpcResult<Token>;

    #[method(name = "getTokenData")]
    fn get_token_data(&self, symbol: String, token_id: String) -> RpcResult<TokenData>;

    #[method(name = "getApps")]
    fn get_apps(&self) -> RpcResult<Vec<App>>;

    #[method(name = "getTokenTransfers")]
    fn get_token_transfers(&self, symbol: String, page: u64, page_size: u64) -> RpcResult<Paginated<Vec<Transaction>>>;

    #[method(name = "getTokenTransferCount")]
    fn get_token_transfer_count(&self, symbol: String) -> RpcResult<u64>;

    #[method(name = "getTokenBalance")]
    fn get_token_balance(&self, address: String, symbol: String, chain: String) -> RpcResult<Balance>;

    #[method(name = "getAuctionsCount")]
    fn get_auctions_count(&self, symbol: String) -> RpcResult<u64>;

    #[method(name = "getAuctions")]
    fn get_auctions(&self, symbol: String, page: u64, page_size: u64) -> RpcResult<Paginated<Vec<Auction>>>;

    #[method(name = "getAuction")]
    fn get_auction(&self, symbol: String, token_id: String) -> RpcResult<Auction>;
}
