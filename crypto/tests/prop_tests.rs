use proptest::prelude::*;

use historia_crypto::{commit, verify};
use historia_types::{Address, Vote};

fn vote_strategy() -> impl Strategy<Value = Vote> {
    prop::bool::ANY.prop_map(Vote::from_bool)
}

proptest! {
    /// A commitment always verifies against its own inputs.
    #[test]
    fn commitment_determinism(
        addr in "g1[a-z0-9]{10,38}",
        vote in vote_strategy(),
        secret in "[0-9a-f]{0,64}",
    ) {
        let address = Address::parse(addr).unwrap();
        let hash = commit(&address, vote, &secret);
        prop_assert!(verify(&address, vote, &secret, &hash));
        prop_assert_eq!(hash, commit(&address, vote, &secret));
    }

    /// Different addresses never share a commitment for the same vote and secret.
    #[test]
    fn commitment_binding(
        a1 in "g1[a-z0-9]{10,38}",
        a2 in "g1[a-z0-9]{10,38}",
        vote in vote_strategy(),
        secret in "[0-9a-f]{64}",
    ) {
        prop_assume!(a1 != a2);
        let h1 = commit(&Address::parse(a1).unwrap(), vote, &secret);
        let h2 = commit(&Address::parse(a2).unwrap(), vote, &secret);
        prop_assert_ne!(h1, h2);
    }

    /// Flipping the vote always breaks verification.
    #[test]
    fn flipped_vote_fails(
        addr in "g1[a-z0-9]{10,38}",
        vote in vote_strategy(),
        secret in "[0-9a-f]{64}",
    ) {
        let address = Address::parse(addr).unwrap();
        let hash = commit(&address, vote, &secret);
        let flipped = Vote::from_bool(!vote.is_for());
        prop_assert!(!verify(&address, flipped, &secret, &hash));
    }
}
