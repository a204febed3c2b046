//! Wallet session bootstrap. The dual wallet source (embedded frame
//! provider vs generic browser provider) is a capability-polymorphism point:
//! one [`WalletSigner`] interface, two concrete providers, selected once at
//! session start and never re-detected per call.

use cosmwasm_std::Addr;
use ember_types::claims::SessionStatus;

use crate::{
    error::{SessionError, SignerError},
    provider::WalletSigner,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    EmbeddedFrame,
    Browser,
}

/// The providers offered by the host at startup.
pub struct SignerSources<S> {
    pub embedded_frame: Option<S>,
    pub browser: Option<S>,
}

#[derive(Debug)]
pub struct Session<S: WalletSigner> {
    signer: S,
    kind: ProviderKind,
    status: SessionStatus,
    wallet: Option<Addr>,
    expected_chain_id: String,
}

impl<S: WalletSigner> Session<S> {
    /// Picks the signing provider for the whole session: the embedded frame
    /// provider when present, the browser provider otherwise. A
    /// frame-required context without an embedded provider is `NotInFrame`.
    pub fn select(
        sources: SignerSources<S>,
        require_frame: bool,
        expected_chain_id: impl Into<String>,
    ) -> Result<Session<S>, SessionError> {
        let (signer, kind) = match (sources.embedded_frame, sources.browser) {
            (Some(signer), _) => (signer, ProviderKind::EmbeddedFrame),
            (None, _) if require_frame => return Err(SessionError::NotInFrame),
            (None, Some(signer)) => (signer, ProviderKind::Browser),
            (None, None) => return Err(SessionError::NoProvider),
        };
        Ok(Session {
            signer,
            kind,
            status: SessionStatus::Booting,
            wallet: None,
            expected_chain_id: expected_chain_id.into(),
        })
    }

    /// Requests accounts and aligns the wallet to the expected chain.
    /// Failures leave the session in `Error` but usable for a retry.
    pub fn connect(&mut self) -> Result<Addr, SignerError> {
        self.status = SessionStatus::Connecting;
        match self.try_connect() {
            Ok(wallet) => {
                self.wallet = Some(wallet.clone());
                self.status = SessionStatus::Ready;
                Ok(wallet)
            }
            Err(err) => {
                self.status = SessionStatus::Error;
                Err(err)
            }
        }
    }

    fn try_connect(&self) -> Result<Addr, SignerError> {
        let accounts = self.signer.request_accounts()?;
        let wallet = accounts.into_iter().next().ok_or(SignerError::Unavailable)?;
        if self.signer.chain_id()? != self.expected_chain_id {
            self.signer.switch_chain(&self.expected_chain_id)?;
        }
        Ok(wallet)
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn kind(&self) -> ProviderKind {
        self.kind
    }

    pub fn wallet(&self) -> Option<&Addr> {
        self.wallet.as_ref()
    }

    pub fn signer(&self) -> &S {
        &self.signer
    }

    pub fn into_signer(self) -> S {
        self.signer
    }
}
