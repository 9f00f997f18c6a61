use super::{Applied, RegistryService};
use crate::domain::{
    AuthorizationGuard, Community, Network, Record, RecordKey, RegistryError, RegistryResult,
};
use crate::events::RegistryEvent;
use crate::instruction::{CreateNetwork, UpdateNetwork};
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
    pub(crate) fn run_create_network(
        &self,
        signer: &Pubkey,
        args: CreateNetwork,
    ) -> RegistryResult<Applied<Network>> {
        let _tx = self.tx_lock.lock();
        let community: Community = self.load(&args.community)?;
        AuthorizationGuard::check_authority(signer, &community)?;

        let key = RecordKey::Network {
            community: args.community.address,
            name: args.name,
        };
        self.claim(&key, &args.network)?;
        let network = Network {
            community: args.community.address,
            nonce: args.network.nonce,
            name: args.name,
            rewards: args.rewards,
        };

        self.commit(
            WriteBatch::new().create(key, args.network, network.encode()),
            None,
        )?;
        info!(
            community = %args.community.address,
            network = %args.network.address,
            name = %args.name,
            "network created"
        );
        let event = RegistryEvent::NetworkCreated {
            community: args.community.address,
            network: args.network.address,
            name: args.name,
        };
        self.finish(network, event)
    }

    pub(crate) fn run_update_network(
        &self,
        signer: &Pubkey,
        args: UpdateNetwork,
    ) -> RegistryResult<Applied<Network>> {
        let _tx = self.tx_lock.lock();
        let community: Community = self.load(&args.community)?;
        AuthorizationGuard::check_authority(signer, &community)?;
        let mut network: Network = self.load(&args.network)?;
        if network.community != args.community.address {
            return Err(RegistryError::CommunityMismatch);
        }

        network.rewards = args.rewards;
        self.commit(
            WriteBatch::new().update(args.network.address, Network::KIND, network.encode()),
            None,
        )?;
        info!(network = %args.network.address, "network updated");
        let event = RegistryEvent::NetworkUpdated {
            network: args.network.address,
            rewards: args.rewards,
        };
        self.finish(network, event)
    }
}
