use crate::ui;
use alloy::{
    network::EthereumWallet,
    primitives::{Address, U256},
    providers::{DynProvider, Provider, ProviderBuilder},
    signers::local::PrivateKeySigner,
};
use color_eyre::eyre::{Result, WrapErr};
use std::time::{Duration, Instant};
use tokio::{sync::mpsc, time};
use tracing::{error, info, warn};
use vending_machine::{
    contribution_amount,
    network::NetworkProfile,
    short_address,
    vending_types::VendingMachine,
    view::{self, CopyFeedback, Page, Screen, SessionFacts, ViewState},
    wallets,
};

const POLL_INTERVAL: Duration = Duration::from_millis(1000);
const MAX_STORED_ERRORS: usize = 50;

type VendingClient = VendingMachine::VendingMachineInstance<DynProvider>;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub profile: NetworkProfile,
    pub rpc_url: String,
    pub contract: Address,
    pub wallet: wallets::WalletDescriptor,
}

#[derive(Clone)]
pub struct Clients {
    pub provider: DynProvider,
    pub vending: VendingClient,
}

/// Wallet session as reported by the connection provider. Connected iff an
/// address is attached.
#[derive(Clone, Copy, Debug, Default)]
pub struct Session {
    pub address: Option<Address>,
    pub chain_id: Option<u64>,
}

impl Session {
    pub fn is_connected(&self) -> bool {
        self.address.is_some()
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum WriteAction {
    Contribute,
    Withdraw,
}

impl WriteAction {
    fn describe(self) -> &'static str {
        match self {
            WriteAction::Contribute => "Contribution",
            WriteAction::Withdraw => "Withdrawal",
        }
    }
}

/// Lifecycle of one submitted write. A fresh submission of the same action
/// replaces the previous value wholesale.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub enum WriteStatus {
    #[default]
    Idle,
    Pending {
        tx_hash: Option<String>,
    },
    Confirmed {
        tx_hash: String,
    },
    Failed {
        error: String,
    },
}

impl WriteStatus {
    pub fn is_pending(&self) -> bool {
        matches!(self, WriteStatus::Pending { .. })
    }
}

#[derive(Clone, Debug)]
pub enum WriteOutcome {
    Submitted { action: WriteAction, tx_hash: String },
    Confirmed { action: WriteAction, tx_hash: String },
    Failed { action: WriteAction, error: String },
}

/// Everything the renderer needs for one frame.
#[derive(Clone, Debug)]
pub struct AppSnapshot {
    pub screen: Screen,
    pub wallet_name: String,
    pub address: Option<Address>,
    pub chain_id: Option<u64>,
    pub profile: NetworkProfile,
    pub owner: Option<Address>,
    pub is_owner: bool,
    pub price: Option<U256>,
    pub purchases: Option<U256>,
    pub contribute: WriteStatus,
    pub withdraw: WriteStatus,
    pub copy_feedback: bool,
    pub status: String,
    pub errors: Vec<String>,
}

pub struct AppController {
    config: AppConfig,
    signer: PrivateKeySigner,
    rpc_url: String,
    clients: Option<Clients>,
    session: Session,
    view: ViewState,
    owner: Option<Address>,
    price: Option<U256>,
    purchases: Option<U256>,
    contribute: WriteStatus,
    withdraw: WriteStatus,
    copy_feedback: CopyFeedback,
    status: String,
    errors: Vec<String>,
}

impl AppController {
    /// Unlocks the configured wallet (this may prompt for a password, so it
    /// must run before the terminal is put into raw mode).
    pub fn new(config: AppConfig) -> Result<Self> {
        let signer = wallets::unlock_wallet(&config.wallet)?;
        info!(wallet = %config.wallet.name, address = %signer.address(), "wallet unlocked");
        let rpc_url = config.rpc_url.clone();
        Ok(Self {
            config,
            signer,
            rpc_url,
            clients: None,
            session: Session::default(),
            view: ViewState::default(),
            owner: None,
            price: None,
            purchases: None,
            contribute: WriteStatus::default(),
            withdraw: WriteStatus::default(),
            copy_feedback: CopyFeedback::default(),
            status: String::from("Ready"),
            errors: Vec::new(),
        })
    }

    fn facts(&self) -> SessionFacts {
        SessionFacts {
            connected: self.session.is_connected(),
            chain_ok: self.session.chain_id == Some(self.config.profile.chain_id),
            is_owner: view::owner_match(self.session.address, self.owner),
        }
    }

    /// Attach the unlocked signer to a live provider session on the current
    /// endpoint and record the endpoint's chain id.
    async fn attach(&mut self) -> Result<()> {
        let wallet = EthereumWallet::from(self.signer.clone());
        let provider = ProviderBuilder::new()
            .wallet(wallet)
            .connect(&self.rpc_url)
            .await
            .wrap_err_with(|| format!("Failed to reach RPC endpoint {}", self.rpc_url))?
            .erased();
        let chain_id = provider
            .get_chain_id()
            .await
            .wrap_err("Failed to query chain id")?;
        let vending = VendingMachine::new(self.config.contract, provider.clone());
        self.clients = Some(Clients { provider, vending });
        self.session = Session {
            address: Some(self.signer.address()),
            chain_id: Some(chain_id),
        };
        if chain_id == self.config.profile.chain_id {
            self.status = format!("Connected as {}", short_address(&self.signer.address()));
        } else {
            warn!(
                chain_id,
                expected = self.config.profile.chain_id,
                "endpoint reports an unexpected chain"
            );
            self.status = format!(
                "Connected to chain {chain_id}; {} expects {}",
                self.config.profile.name, self.config.profile.chain_id
            );
        }
        info!(chain_id, rpc = %self.rpc_url, "session attached");
        Ok(())
    }

    pub async fn connect(&mut self) -> Result<()> {
        if self.session.is_connected() {
            return Ok(());
        }
        self.attach().await
    }

    pub fn disconnect(&mut self) {
        self.clients = None;
        self.session = Session::default();
        self.owner = None;
        self.price = None;
        self.purchases = None;
        self.contribute = WriteStatus::Idle;
        self.withdraw = WriteStatus::Idle;
        self.status = String::from("Disconnected");
        info!("session detached");
    }

    /// Point the session back at the profile's canonical endpoint and
    /// re-attach, for when the configured `--rpc-url` turned out to serve a
    /// different chain.
    pub async fn switch_network(&mut self) -> Result<()> {
        self.rpc_url = self.config.profile.rpc_url.clone();
        self.attach().await
    }

    /// Re-issue the read-only queries. Failed reads keep the previous cached
    /// value; the page keeps rendering the last known state.
    pub async fn refresh(&mut self) {
        let Some(clients) = self.clients.clone() else {
            return;
        };
        match clients.provider.get_chain_id().await {
            Ok(id) => self.session.chain_id = Some(id),
            Err(e) => warn!(error = %e, "chain id refresh failed"),
        }
        if self.session.chain_id != Some(self.config.profile.chain_id) {
            // Contract reads are meaningless against a foreign chain.
            return;
        }
        match clients.vending.hargaProduk().call().await {
            Ok(value) => self.price = Some(value),
            Err(e) => warn!(error = %e, "hargaProduk read failed"),
        }
        match clients.vending.owner().call().await {
            Ok(value) => self.owner = Some(value),
            Err(e) => warn!(error = %e, "owner read failed"),
        }
        if let Some(address) = self.session.address {
            match clients.vending.jumlahPembelian(address).call().await {
                Ok(value) => self.purchases = Some(value),
                Err(e) => warn!(error = %e, "jumlahPembelian read failed"),
            }
        }
    }

    pub fn navigate(&mut self, page: Page) {
        let facts = self.facts();
        self.view.navigate(page, facts);
    }

    /// Submit a write unless one of the same action is already in flight.
    /// The task reports back over `outcomes`; nothing blocks the event loop.
    pub fn submit(&mut self, action: WriteAction, outcomes: &mpsc::UnboundedSender<WriteOutcome>) {
        let Some(clients) = self.clients.clone() else {
            self.push_error(String::from("Not connected"));
            return;
        };
        let status = self.write_status_mut(action);
        if status.is_pending() {
            return;
        }
        if action == WriteAction::Withdraw && !self.facts().is_owner {
            self.push_error(String::from("Only the contract owner can withdraw"));
            return;
        }
        *self.write_status_mut(action) = WriteStatus::Pending { tx_hash: None };
        self.status = format!("{} pending...", action.describe());
        spawn_write(action, clients.vending, outcomes.clone());
    }

    fn write_status_mut(&mut self, action: WriteAction) -> &mut WriteStatus {
        match action {
            WriteAction::Contribute => &mut self.contribute,
            WriteAction::Withdraw => &mut self.withdraw,
        }
    }

    pub fn apply_write_outcome(&mut self, outcome: WriteOutcome) {
        match outcome {
            WriteOutcome::Submitted { action, tx_hash } => {
                self.status = format!("{} pending: {tx_hash}", action.describe());
                *self.write_status_mut(action) = WriteStatus::Pending {
                    tx_hash: Some(tx_hash),
                };
            }
            WriteOutcome::Confirmed { action, tx_hash } => {
                info!(%tx_hash, "{} confirmed", action.describe());
                self.status = format!("{} confirmed", action.describe());
                *self.write_status_mut(action) = WriteStatus::Confirmed { tx_hash };
            }
            WriteOutcome::Failed { action, error } => {
                error!(%error, "{} failed", action.describe());
                self.status = format!("{} failed", action.describe());
                self.push_error(format!("{} failed: {error}", action.describe()));
                *self.write_status_mut(action) = WriteStatus::Failed { error };
            }
        }
    }

    /// Copy the session address to the clipboard. Failures are logged only;
    /// the feedback flag is raised either way.
    pub fn copy_address(&mut self, now: Instant) {
        let Some(address) = self.session.address else {
            return;
        };
        match arboard::Clipboard::new().and_then(|mut clipboard| clipboard.set_text(address.to_string())) {
            Ok(()) => info!(%address, "address copied to clipboard"),
            Err(e) => warn!(error = %e, "clipboard copy failed"),
        }
        self.copy_feedback.activate(now);
    }

    /// Expire the copy-feedback window. Returns whether anything changed.
    pub fn tick(&mut self, now: Instant) -> bool {
        self.copy_feedback.tick(now)
    }

    pub fn push_error(&mut self, message: String) {
        error!("{message}");
        self.errors.push(message);
        if self.errors.len() > MAX_STORED_ERRORS {
            let drain = self.errors.len() - MAX_STORED_ERRORS;
            self.errors.drain(0..drain);
        }
    }

    pub fn snapshot(&mut self) -> AppSnapshot {
        let facts = self.facts();
        let screen = self.view.resolve(facts);
        AppSnapshot {
            screen,
            wallet_name: self.config.wallet.name.clone(),
            address: self.session.address,
            chain_id: self.session.chain_id,
            profile: self.config.profile.clone(),
            owner: self.owner,
            is_owner: facts.is_owner,
            price: self.price,
            purchases: self.purchases,
            contribute: self.contribute.clone(),
            withdraw: self.withdraw.clone(),
            copy_feedback: self.copy_feedback.is_active(),
            status: self.status.clone(),
            errors: self.errors.iter().rev().take(5).cloned().collect(),
        }
    }
}

/// Drive one write to completion on its own task. Both calls yield the same
/// pending-transaction type, so the submission is matched once up front.
fn spawn_write(
    action: WriteAction,
    vending: VendingClient,
    outcomes: mpsc::UnboundedSender<WriteOutcome>,
) {
    tokio::spawn(async move {
        let submitted = match action {
            WriteAction::Contribute => {
                vending
                    .beliProduk()
                    .value(contribution_amount())
                    .send()
                    .await
            }
            WriteAction::Withdraw => vending.tarikDana().send().await,
        };
        let pending = match submitted {
            Ok(pending) => pending,
            Err(e) => {
                let _ = outcomes.send(WriteOutcome::Failed {
                    action,
                    error: e.to_string(),
                });
                return;
            }
        };
        let tx_hash = format!("{:#x}", pending.tx_hash());
        let _ = outcomes.send(WriteOutcome::Submitted {
            action,
            tx_hash: tx_hash.clone(),
        });
        match pending.get_receipt().await {
            Ok(receipt) if receipt.status() => {
                let _ = outcomes.send(WriteOutcome::Confirmed { action, tx_hash });
            }
            Ok(_) => {
                let _ = outcomes.send(WriteOutcome::Failed {
                    action,
                    error: format!("transaction {tx_hash} reverted"),
                });
            }
            Err(e) => {
                let _ = outcomes.send(WriteOutcome::Failed {
                    action,
                    error: e.to_string(),
                });
            }
        }
    });
}

pub async fn run_app(config: AppConfig) -> Result<()> {
    let mut controller = AppController::new(config)?;
    let mut ui_state = ui::UiState::default();
    let mut input_events = ui::input_event_stream();

    // UI bootstrap
    ui::terminal_enter(&mut ui_state)?;
    let res = run_loop(&mut controller, &mut ui_state, &mut input_events).await;
    ui::terminal_exit()?;
    res
}

async fn run_loop(
    controller: &mut AppController,
    ui_state: &mut ui::UiState,
    input_events: &mut ui::InputEventReceiver,
) -> Result<()> {
    let (outcome_tx, mut outcome_rx) = mpsc::unbounded_channel();
    let mut ticker = time::interval(POLL_INTERVAL);
    let mut snapshot = controller.snapshot();
    ui::draw(ui_state, &snapshot)?;
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => { break; }
            _ = ticker.tick() => {
                controller.refresh().await;
                controller.tick(Instant::now());
                snapshot = controller.snapshot();
                ui::draw(ui_state, &snapshot)?;
            }
            Some(outcome) = outcome_rx.recv() => {
                controller.apply_write_outcome(outcome);
                snapshot = controller.snapshot();
                ui::draw(ui_state, &snapshot)?;
            }
            raw = ui::next_raw_event(input_events) => {
                let Some(event) = ui::interpret_event(ui_state, raw?) else { continue; };
                match event {
                    ui::UserEvent::Quit => break,
                    ui::UserEvent::Redraw => {
                        ui::draw(ui_state, &snapshot)?;
                        continue;
                    }
                    ui::UserEvent::Connect => {
                        ui::chime(ui_state);
                        match controller.connect().await {
                            Ok(()) => controller.refresh().await,
                            Err(e) => controller.push_error(format!("Connect failed: {e}")),
                        }
                    }
                    ui::UserEvent::Disconnect => controller.disconnect(),
                    ui::UserEvent::SwitchNetwork => {
                        match controller.switch_network().await {
                            Ok(()) => controller.refresh().await,
                            Err(e) => controller.push_error(format!("Network switch failed: {e}")),
                        }
                    }
                    ui::UserEvent::Navigate(page) => controller.navigate(page),
                    ui::UserEvent::Contribute => controller.submit(WriteAction::Contribute, &outcome_tx),
                    ui::UserEvent::Withdraw => controller.submit(WriteAction::Withdraw, &outcome_tx),
                    ui::UserEvent::CopyAddress => controller.copy_address(Instant::now()),
                }
                snapshot = controller.snapshot();
                ui::draw(ui_state, &snapshot)?;
            }
        }
    }
    Ok(())
}
