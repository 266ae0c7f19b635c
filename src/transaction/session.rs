//! Multi-party signature collection.
//!
//! A [`SigningSession`] owns one slot per party declared by its
//! [`TransactionVariant`]. Slots fill in any order except the fee payer, who
//! signs last. A filled slot is never replaced; changing the fee payer yields
//! a fresh session that every party signs again.
//!
//! ```rust,ignore
//! let mut session = SigningSession::new(TransactionVariant::MultiAgent {
//!     raw,
//!     secondary_signers: vec![bob.address(), carol.address()],
//! })?;
//! session.sign_as_secondary(&carol)?;
//! session.sign_as_sender(&alice)?;
//! session.sign_as_secondary(&bob)?;
//! let signed = session.finish()?;
//! ```

use std::collections::HashSet;

use crate::auth::TransactionSigner;
use crate::error::{SdkError, SdkResult};
use crate::transaction::authenticator::{AccountAuthenticator, TransactionAuthenticator};
use crate::transaction::raw::TransactionVariant;
use crate::transaction::signed::SignedTransaction;
use crate::types::AccountAddress;

/// Readiness of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SigningState {
    Unsigned,
    PartiallySigned { signed: usize, required: usize },
    FullySigned,
}

#[derive(Debug, Clone)]
pub struct SigningSession {
    variant: TransactionVariant,
    message: Vec<u8>,
    sender: Option<AccountAuthenticator>,
    /// Parallel to `variant.secondary_signers()`.
    secondaries: Vec<Option<AccountAuthenticator>>,
    fee_payer: Option<AccountAuthenticator>,
    /// Set once an unverified signature is attached.
    simulation_only: bool,
}

impl SigningSession {
    /// Start collecting signatures for `variant`.
    ///
    /// Fails if a party is declared twice.
    pub fn new(variant: TransactionVariant) -> SdkResult<Self> {
        let sender = variant.raw().sender;
        let mut seen = HashSet::from([sender]);
        for address in variant.secondary_signers() {
            if !seen.insert(*address) {
                return Err(SdkError::SignatureMismatch(format!(
                    "{address} is declared more than once"
                )));
            }
        }

        let message = variant.signing_message();
        let secondaries = vec![None; variant.secondary_signers().len()];
        Ok(Self {
            variant,
            message,
            sender: None,
            secondaries,
            fee_payer: None,
            simulation_only: false,
        })
    }

    pub fn variant(&self) -> &TransactionVariant {
        &self.variant
    }

    /// Bytes every party signs.
    pub fn signing_message(&self) -> &[u8] {
        &self.message
    }

    /// Number of signatures needed before [`finish`](Self::finish).
    pub fn required(&self) -> usize {
        1 + self.secondaries.len() + usize::from(self.variant.has_fee_payer_slot())
    }

    pub fn signed(&self) -> usize {
        usize::from(self.sender.is_some())
            + self.secondaries.iter().filter(|slot| slot.is_some()).count()
            + usize::from(self.fee_payer.is_some())
    }

    pub fn state(&self) -> SigningState {
        match (self.signed(), self.required()) {
            (0, _) => SigningState::Unsigned,
            (signed, required) if signed == required => SigningState::FullySigned,
            (signed, required) => SigningState::PartiallySigned { signed, required },
        }
    }

    /// Confirm the declared parties are the ones the caller expects.
    pub fn expect_topology(
        &self,
        secondary_signers: &[AccountAddress],
        fee_payer: Option<AccountAddress>,
    ) -> SdkResult<()> {
        if self.variant.secondary_signers() != secondary_signers {
            return Err(SdkError::SignatureMismatch(format!(
                "declared secondary signers {:?}, expected {:?}",
                self.variant.secondary_signers(),
                secondary_signers
            )));
        }
        if self.variant.fee_payer() != fee_payer {
            return Err(SdkError::SignatureMismatch(format!(
                "declared fee payer {:?}, expected {:?}",
                self.variant.fee_payer(),
                fee_payer
            )));
        }
        Ok(())
    }

    // ── Signing ──────────────────────────────────────────────────────────

    pub fn sign_as_sender(&mut self, signer: &impl TransactionSigner) -> SdkResult<()> {
        self.check_sender(signer.address())?;
        let authenticator = signer.sign(&self.message)?;
        self.sender = Some(authenticator);
        Ok(())
    }

    pub fn sign_as_secondary(&mut self, signer: &impl TransactionSigner) -> SdkResult<()> {
        let index = self.secondary_slot(signer.address())?;
        let authenticator = signer.sign(&self.message)?;
        self.secondaries[index] = Some(authenticator);
        Ok(())
    }

    /// Sign as the sponsor. Every other party must have signed already.
    pub fn sign_as_fee_payer(&mut self, signer: &impl TransactionSigner) -> SdkResult<()> {
        self.check_fee_payer(signer.address())?;
        let authenticator = signer.sign(&self.message)?;
        self.fee_payer = Some(authenticator);
        Ok(())
    }

    // ── Externally produced signatures ───────────────────────────────────

    /// Attach a signature produced elsewhere. It must verify against
    /// [`signing_message`](Self::signing_message).
    pub fn attach_sender(&mut self, authenticator: AccountAuthenticator) -> SdkResult<()> {
        self.check_sender(self.variant.raw().sender)?;
        authenticator.verify(&self.message)?;
        self.sender = Some(authenticator);
        Ok(())
    }

    pub fn attach_secondary(
        &mut self,
        address: AccountAddress,
        authenticator: AccountAuthenticator,
    ) -> SdkResult<()> {
        let index = self.secondary_slot(address)?;
        authenticator.verify(&self.message)?;
        self.secondaries[index] = Some(authenticator);
        Ok(())
    }

    pub fn attach_fee_payer(
        &mut self,
        address: AccountAddress,
        authenticator: AccountAuthenticator,
    ) -> SdkResult<()> {
        self.check_fee_payer(address)?;
        authenticator.verify(&self.message)?;
        self.fee_payer = Some(authenticator);
        Ok(())
    }

    // ── Simulation ───────────────────────────────────────────────────────
    //
    // Unverified attachments, e.g. [`AccountAuthenticator::for_simulation`].
    // A session holding one can only end in `finish_for_simulation`.

    pub fn attach_sender_for_simulation(
        &mut self,
        authenticator: AccountAuthenticator,
    ) -> SdkResult<()> {
        self.check_sender(self.variant.raw().sender)?;
        self.sender = Some(authenticator);
        self.simulation_only = true;
        Ok(())
    }

    pub fn attach_secondary_for_simulation(
        &mut self,
        address: AccountAddress,
        authenticator: AccountAuthenticator,
    ) -> SdkResult<()> {
        let index = self.secondary_slot(address)?;
        self.secondaries[index] = Some(authenticator);
        self.simulation_only = true;
        Ok(())
    }

    /// Fill the fee payer slot, even while the sponsor is still unknown.
    pub fn attach_fee_payer_for_simulation(
        &mut self,
        authenticator: AccountAuthenticator,
    ) -> SdkResult<()> {
        if !self.variant.has_fee_payer_slot() {
            return Err(SdkError::SignatureMismatch(
                "transaction has no fee payer slot".to_string(),
            ));
        }
        if self.fee_payer.is_some() {
            return Err(SdkError::SignatureMismatch(
                "fee payer has already signed".to_string(),
            ));
        }
        self.fee_payer = Some(authenticator);
        self.simulation_only = true;
        Ok(())
    }

    // ── Transitions ──────────────────────────────────────────────────────

    /// Assign (or change) the sponsor. Returns an unsigned session over the
    /// new message; signatures collected so far are discarded.
    pub fn with_fee_payer(self, fee_payer: AccountAddress) -> SdkResult<Self> {
        match self.variant {
            TransactionVariant::FeePayer {
                raw,
                secondary_signers,
                ..
            } => Self::new(TransactionVariant::FeePayer {
                raw,
                secondary_signers,
                fee_payer: Some(fee_payer),
            }),
            _ => Err(SdkError::SignatureMismatch(
                "transaction has no fee payer slot".to_string(),
            )),
        }
    }

    /// Assemble the signed transaction. Requires every slot filled with a
    /// verified signature and, for fee-payer transactions, an assigned fee
    /// payer.
    pub fn finish(self) -> SdkResult<SignedTransaction> {
        if self.variant.has_fee_payer_slot() && self.variant.fee_payer().is_none() {
            return Err(SdkError::MissingField("fee_payer"));
        }
        if self.simulation_only {
            return Err(SdkError::SignatureMismatch(
                "session holds simulation-only signatures".to_string(),
            ));
        }
        self.assemble()
    }

    /// Like [`finish`](Self::finish) but allows an unassigned fee payer,
    /// which is then encoded as `0x0`, and unverified signatures. Only
    /// useful for simulation.
    pub fn finish_for_simulation(self) -> SdkResult<SignedTransaction> {
        self.assemble()
    }

    fn assemble(self) -> SdkResult<SignedTransaction> {
        if self.state() != SigningState::FullySigned {
            return Err(SdkError::SignatureMismatch(format!(
                "{} of {} signatures collected",
                self.signed(),
                self.required()
            )));
        }

        let fee_payer_address = self.variant.fee_payer().unwrap_or(AccountAddress::ZERO);
        let Self {
            variant,
            sender,
            secondaries,
            fee_payer,
            ..
        } = self;
        let sender = sender.ok_or(SdkError::MissingField("sender signature"))?;
        let secondary = variant
            .secondary_signers()
            .iter()
            .copied()
            .zip(secondaries.into_iter().flatten())
            .collect::<Vec<_>>();

        let authenticator = match &variant {
            TransactionVariant::SingleSender(_) => TransactionAuthenticator::single(sender),
            TransactionVariant::MultiAgent { .. } => {
                TransactionAuthenticator::multi_agent(sender, secondary)
            }
            TransactionVariant::FeePayer { .. } => {
                let fee_payer = fee_payer.ok_or(SdkError::MissingField("fee payer signature"))?;
                TransactionAuthenticator::fee_payer(sender, secondary, (fee_payer_address, fee_payer))
            }
        };
        Ok(SignedTransaction::new(variant.into_raw(), authenticator))
    }

    // ── Slot checks ──────────────────────────────────────────────────────

    fn check_sender(&self, address: AccountAddress) -> SdkResult<()> {
        let sender = self.variant.raw().sender;
        if address != sender {
            return Err(SdkError::SignatureMismatch(format!(
                "{address} is not the sender {sender}"
            )));
        }
        if self.sender.is_some() {
            return Err(SdkError::SignatureMismatch(format!(
                "sender {sender} has already signed"
            )));
        }
        Ok(())
    }

    fn secondary_slot(&self, address: AccountAddress) -> SdkResult<usize> {
        let index = self
            .variant
            .secondary_signers()
            .iter()
            .position(|declared| *declared == address)
            .ok_or_else(|| {
                SdkError::SignatureMismatch(format!("{address} is not a declared secondary signer"))
            })?;
        if self.secondaries[index].is_some() {
            return Err(SdkError::SignatureMismatch(format!(
                "secondary signer {address} has already signed"
            )));
        }
        Ok(index)
    }

    fn check_fee_payer(&self, address: AccountAddress) -> SdkResult<()> {
        if !self.variant.has_fee_payer_slot() {
            return Err(SdkError::SignatureMismatch(
                "transaction has no fee payer slot".to_string(),
            ));
        }
        match self.variant.fee_payer() {
            None => return Err(SdkError::MissingField("fee_payer")),
            Some(declared) if declared != address => {
                return Err(SdkError::SignatureMismatch(format!(
                    "{address} is not the declared fee payer {declared}"
                )))
            }
            Some(_) => {}
        }
        if self.fee_payer.is_some() {
            return Err(SdkError::SignatureMismatch(format!(
                "fee payer {address} has already signed"
            )));
        }
        if self.sender.is_none() || self.secondaries.iter().any(Option::is_none) {
            return Err(SdkError::SignatureMismatch(
                "fee payer must sign after the sender and every secondary signer".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transaction::authenticator::{Ed25519PublicKey, Ed25519Signature};
    use crate::transaction::raw::tests::sample_raw;
    use std::cell::RefCell;

    /// Deterministic signer that records the messages it was asked to sign.
    struct FakeSigner {
        address: AccountAddress,
        tag: u8,
        seen: RefCell<Vec<Vec<u8>>>,
    }

    impl FakeSigner {
        fn new(address: &str, tag: u8) -> Self {
            Self {
                address: address.parse().unwrap(),
                tag,
                seen: RefCell::new(Vec::new()),
            }
        }
    }

    impl TransactionSigner for FakeSigner {
        fn address(&self) -> AccountAddress {
            self.address
        }

        fn sign(&self, message: &[u8]) -> SdkResult<AccountAuthenticator> {
            self.seen.borrow_mut().push(message.to_vec());
            Ok(AccountAuthenticator::ed25519(
                Ed25519PublicKey::new([self.tag; 32]),
                Ed25519Signature::new([self.tag; 64]),
            ))
        }
    }

    fn tag_of(authenticator: &AccountAuthenticator) -> u8 {
        match authenticator {
            AccountAuthenticator::Ed25519 { public_key, .. } => public_key.as_bytes()[0],
        }
    }

    fn multi_agent(secondaries: &[&FakeSigner]) -> TransactionVariant {
        TransactionVariant::MultiAgent {
            raw: sample_raw(),
            secondary_signers: secondaries.iter().map(|s| s.address).collect(),
        }
    }

    #[test]
    fn test_single_sender_flow() {
        let alice = FakeSigner::new("0xa11ce", 1);
        let mut session =
            SigningSession::new(TransactionVariant::SingleSender(sample_raw())).unwrap();
        assert_eq!(session.state(), SigningState::Unsigned);
        session.sign_as_sender(&alice).unwrap();
        assert_eq!(session.state(), SigningState::FullySigned);

        let signed = session.finish().unwrap();
        assert!(matches!(
            signed.authenticator(),
            TransactionAuthenticator::Ed25519 { .. }
        ));
        assert_eq!(alice.seen.borrow()[0], sample_raw().signing_message());
    }

    #[test]
    fn test_secondary_order_follows_declaration_not_call_order() {
        let alice = FakeSigner::new("0xa11ce", 1);
        let bob = FakeSigner::new("0xb0b", 2);
        let carol = FakeSigner::new("0xc0c", 3);
        let mut session = SigningSession::new(multi_agent(&[&bob, &carol])).unwrap();

        session.sign_as_secondary(&carol).unwrap();
        assert_eq!(
            session.state(),
            SigningState::PartiallySigned {
                signed: 1,
                required: 3
            }
        );
        session.sign_as_sender(&alice).unwrap();
        session.sign_as_secondary(&bob).unwrap();

        let signed = session.finish().unwrap();
        match signed.authenticator() {
            TransactionAuthenticator::MultiAgent {
                sender,
                secondary_signer_addresses,
                secondary_signers,
            } => {
                assert_eq!(tag_of(sender), 1);
                assert_eq!(secondary_signer_addresses, &vec![bob.address, carol.address]);
                let tags: Vec<u8> = secondary_signers.iter().map(tag_of).collect();
                assert_eq!(tags, vec![2, 3]);
            }
            other => panic!("unexpected authenticator {:?}", other),
        }
    }

    #[test]
    fn test_every_party_signs_the_same_message() {
        let alice = FakeSigner::new("0xa11ce", 1);
        let bob = FakeSigner::new("0xb0b", 2);
        let mut session = SigningSession::new(multi_agent(&[&bob])).unwrap();
        session.sign_as_sender(&alice).unwrap();
        session.sign_as_secondary(&bob).unwrap();
        assert_eq!(alice.seen.borrow()[0], bob.seen.borrow()[0]);
        assert_eq!(alice.seen.borrow()[0], session.signing_message());
    }

    #[test]
    fn test_unknown_party_rejected_before_signing() {
        let mallory = FakeSigner::new("0xbad", 9);
        let bob = FakeSigner::new("0xb0b", 2);
        let mut session = SigningSession::new(multi_agent(&[&bob])).unwrap();

        assert!(matches!(
            session.sign_as_secondary(&mallory),
            Err(SdkError::SignatureMismatch(_))
        ));
        assert!(matches!(
            session.sign_as_sender(&mallory),
            Err(SdkError::SignatureMismatch(_))
        ));
        assert!(mallory.seen.borrow().is_empty());
    }

    #[test]
    fn test_signature_never_replaced() {
        let alice = FakeSigner::new("0xa11ce", 1);
        let mut session =
            SigningSession::new(TransactionVariant::SingleSender(sample_raw())).unwrap();
        session.sign_as_sender(&alice).unwrap();
        assert!(session.sign_as_sender(&alice).is_err());
        assert_eq!(alice.seen.borrow().len(), 1);
    }

    #[test]
    fn test_duplicate_party_rejected() {
        let bob = FakeSigner::new("0xb0b", 2);
        assert!(SigningSession::new(multi_agent(&[&bob, &bob])).is_err());

        let alice = FakeSigner::new("0xa11ce", 1);
        assert!(SigningSession::new(multi_agent(&[&alice])).is_err());
    }

    #[test]
    fn test_finish_requires_all_signatures() {
        let alice = FakeSigner::new("0xa11ce", 1);
        let bob = FakeSigner::new("0xb0b", 2);
        let mut session = SigningSession::new(multi_agent(&[&bob])).unwrap();
        session.sign_as_sender(&alice).unwrap();
        assert!(matches!(
            session.finish(),
            Err(SdkError::SignatureMismatch(_))
        ));
    }

    #[test]
    fn test_fee_payer_signs_last() {
        let alice = FakeSigner::new("0xa11ce", 1);
        let bob = FakeSigner::new("0xb0b", 2);
        let sponsor = FakeSigner::new("0x5905", 5);
        let mut session = SigningSession::new(TransactionVariant::FeePayer {
            raw: sample_raw(),
            secondary_signers: vec![bob.address],
            fee_payer: Some(sponsor.address),
        })
        .unwrap();

        session.sign_as_sender(&alice).unwrap();
        assert!(session.sign_as_fee_payer(&sponsor).is_err());
        session.sign_as_secondary(&bob).unwrap();
        session.sign_as_fee_payer(&sponsor).unwrap();

        let signed = session.finish().unwrap();
        assert_eq!(signed.authenticator().fee_payer_address(), Some(sponsor.address));
    }

    #[test]
    fn test_unassigned_fee_payer() {
        let alice = FakeSigner::new("0xa11ce", 1);
        let sponsor = FakeSigner::new("0x5905", 5);
        let mut session = SigningSession::new(TransactionVariant::FeePayer {
            raw: sample_raw(),
            secondary_signers: vec![],
            fee_payer: None,
        })
        .unwrap();
        session.sign_as_sender(&alice).unwrap();
        assert!(matches!(
            session.sign_as_fee_payer(&sponsor),
            Err(SdkError::MissingField(_))
        ));

        session
            .attach_fee_payer_for_simulation(AccountAuthenticator::for_simulation(
                Ed25519PublicKey::new([5; 32]),
            ))
            .unwrap();
        let simulated = session.clone().finish_for_simulation().unwrap();
        assert_eq!(
            simulated.authenticator().fee_payer_address(),
            Some(AccountAddress::ZERO)
        );
        assert!(matches!(session.finish(), Err(SdkError::MissingField(_))));
    }

    #[test]
    fn test_simulation_only_session_cannot_finish() {
        let alice = FakeSigner::new("0xa11ce", 1);
        let mut session =
            SigningSession::new(TransactionVariant::SingleSender(sample_raw())).unwrap();

        // Fake signatures do not verify.
        let forged = alice.sign(session.signing_message()).unwrap();
        assert!(matches!(
            session.attach_sender(forged),
            Err(SdkError::SignatureMismatch(_))
        ));

        session
            .attach_sender_for_simulation(AccountAuthenticator::for_simulation(
                Ed25519PublicKey::new([1; 32]),
            ))
            .unwrap();
        assert_eq!(session.state(), SigningState::FullySigned);
        assert!(session.clone().finish_for_simulation().is_ok());
        assert!(matches!(
            session.finish(),
            Err(SdkError::SignatureMismatch(_))
        ));
    }

    #[test]
    fn test_with_fee_payer_discards_signatures() {
        let alice = FakeSigner::new("0xa11ce", 1);
        let sponsor = FakeSigner::new("0x5905", 5);
        let mut session = SigningSession::new(TransactionVariant::FeePayer {
            raw: sample_raw(),
            secondary_signers: vec![],
            fee_payer: None,
        })
        .unwrap();
        session.sign_as_sender(&alice).unwrap();
        let unassigned_message = session.signing_message().to_vec();

        let mut session = session.with_fee_payer(sponsor.address).unwrap();
        assert_eq!(session.state(), SigningState::Unsigned);
        assert_ne!(session.signing_message(), unassigned_message.as_slice());
        session.expect_topology(&[], Some(sponsor.address)).unwrap();

        session.sign_as_sender(&alice).unwrap();
        session.sign_as_fee_payer(&sponsor).unwrap();
        assert!(session.finish().is_ok());
    }

    #[test]
    fn test_expect_topology_mismatch() {
        let bob = FakeSigner::new("0xb0b", 2);
        let carol = FakeSigner::new("0xc0c", 3);
        let session = SigningSession::new(multi_agent(&[&bob, &carol])).unwrap();
        assert!(session
            .expect_topology(&[bob.address, carol.address], None)
            .is_ok());
        assert!(matches!(
            session.expect_topology(&[carol.address, bob.address], None),
            Err(SdkError::SignatureMismatch(_))
        ));
    }
}
