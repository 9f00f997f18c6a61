use super::{Applied, RegistryService};
use crate::domain::{
    AuthorizationGuard, Community, CommunityConfig, Record, RecordKey, RegistryError,
    RegistryResult,
};
use crate::events::RegistryEvent;
use crate::instruction::{InitializeCommunity, SetCommunityAuthority, UpdateCommunity};
use crate::ports::{EpochClock, EventPublisher, RecordStore, StakeToken, WriteBatch};
use shared_types::Pubkey;
use tracing::info;

impl<S, T, C, E> RegistryService<S, T, C, E>
where
    S: RecordStore,
    T: StakeToken,
    C: EpochClock,
    E: EventPublisher,
{
    pub(crate) fn run_initialize_community(
        &self,
        signer: &Pubkey,
        args: InitializeCommunity,
    ) -> RegistryResult<Applied<Community>> {
        let _tx = self.tx_lock.lock();
        self.validate_community_config(&args.config)?;
        if args.stake_mint != self.token.mint() {
            return Err(RegistryError::InvalidMint);
        }

        let key = RecordKey::Community { id: args.id };
        self.claim(&key, &args.community)?;
        let custody = self.deriver.custody(&args.community.address)?;
        let community = Community::new(
            args.id,
            args.community.nonce,
            *signer,
            args.stake_mint,
            custody.address,
            args.config,
        );

        self.commit(
            WriteBatch::new().create(key, args.community, community.encode()),
            None,
        )?;
        info!(
            community = %args.community.address,
            authority = %signer.short(),
            custody = %custody.address.short(),
            "community initialized"
        );
        let event = RegistryEvent::CommunityInitialized {
            community: args.community.address,
            authority: *signer,
            stake_custody: custody.address,
        };
        self.finish(community, event)
    }

    pub(crate) fn run_update_community(
        &self,
        signer: &Pubkey,
        args: UpdateCommunity,
    ) -> RegistryResult<Applied<Community>> {
        let _tx = self.tx_lock.lock();
        let mut community: Community = self.load(&args.community)?;
        AuthorizationGuard::check_authority(signer, &community)?;
        self.validate_community_config(&args.config)?;

        community.config = args.config;
        self.commit(
            WriteBatch::new().update(args.community.address, Community::KIND, community.encode()),
            None,
        )?;
        info!(community = %args.community.address, "community updated");
        let event = RegistryEvent::CommunityUpdated {
            community: args.community.address,
            config: community.config.clone(),
        };
        self.finish(community, event)
    }

    pub(crate) fn run_set_community_authority(
        &self,
        signer: &Pubkey,
        args: SetCommunityAuthority,
    ) -> RegistryResult<Applied<Community>> {
        let _tx = self.tx_lock.lock();
        let mut community: Community = self.load(&args.community)?;
        AuthorizationGuard::check_authority(signer, &community)?;
        if args.new_authority == community.authority || args.new_authority.is_zero() {
            return Err(RegistryError::InvalidConfiguration(
                "new authority must be a different, non-zero key".to_string(),
            ));
        }

        let previous = community.authority;
        community.authority = args.new_authority;
        self.commit(
            WriteBatch::new().update(args.community.address, Community::KIND, community.encode()),
            None,
        )?;
        info!(
            community = %args.community.address,
            previous = %previous.short(),
            authority = %args.new_authority.short(),
            "community authority changed"
        );
        let event = RegistryEvent::CommunityAuthorityChanged {
            community: args.community.address,
            previous,
            authority: args.new_authority,
        };
        self.finish(community, event)
    }

    fn validate_community_config(&self, config: &CommunityConfig) -> RegistryResult<()> {
        if config.cooldown_epochs < self.config.min_cooldown_epochs {
            return Err(RegistryError::InvalidConfiguration(format!(
                "cooldown of {} epochs, minimum {}",
                config.cooldown_epochs, self.config.min_cooldown_epochs
            )));
        }
        Ok(())
    }
}
