use std::collections::BTreeMap;

use proptest::prelude::*;
use proptest_derive::Arbitrary;

use crate::Tree;

/// Reference implementation used to check the tree against.
#[derive(Default, Clone)]
struct Model {
    map: BTreeMap<Vec<u8>, u64>,
}

impl Model {
    fn insert(&mut self, key: Vec<u8>, value: u64) -> Option<u64> {
        self.map.insert(key, value)
    }

    fn get(&self, key: &[u8]) -> Option<&u64> {
        self.map.get(key)
    }

    fn remove(&mut self, key: &[u8]) -> Option<u64> {
        self.map.remove(key)
    }

    fn len(&self) -> usize {
        self.map.len()
    }

    fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    fn minimum(&self) -> Option<(&[u8], &u64)> {
        self.map.iter().next().map(|(k, v)| (k.as_slice(), v))
    }

    fn maximum(&self) -> Option<(&[u8], &u64)> {
        self.map.iter().next_back().map(|(k, v)| (k.as_slice(), v))
    }

    fn prefix(&self, prefix: &[u8]) -> Vec<(Vec<u8>, u64)> {
        self.map.range(prefix.to_vec()..).take_while(|(k, _)| k.starts_with(prefix)).map(|(k, v)| (k.clone(), *v)).collect()
    }
}

/// Actions to test against both implementations.
#[derive(Arbitrary, Debug, Clone)]
enum Action {
    Insert(KeyValue),
    Get(Key),
    Remove(Key),
    IterPrefix(Key),
}

/// Key wrapper with a custom strategy that deliberately favors shapes that
/// stress path compression: shared prefixes, delimiter-split segments,
/// and keys that are themselves a prefix of another inserted key.
#[derive(Debug, Clone)]
struct Key(Vec<u8>);

#[derive(Debug, Clone)]
struct KeyValue {
    key: Key,
    value: u64,
}

impl Arbitrary for Key {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        prop_oneof![
            Just(Key(vec![])),
            prop::collection::vec(any::<u8>(), 1..4).prop_map(Key),
            prop::collection::vec(any::<u8>(), 4..64).prop_map(Key),
            "[a-z]{4,8}/[a-z]{1,8}".prop_map(|s| Key(s.into_bytes())),
            "[a-z]{4,8}:[a-z]{1,8}".prop_map(|s| Key(s.into_bytes())),
            "[a-z]{4,8}".prop_map(|prefix| {
                let mut key = prefix.clone().into_bytes();
                key.extend_from_slice(b"/suffix");
                Key(key)
            }),
            // A key that is itself a prefix of a sibling, exercising the
            // virtual-terminator byte.
            "[a-z]{2,6}".prop_map(|s| Key(s.into_bytes())),
        ]
        .boxed()
    }
}

impl Arbitrary for KeyValue {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        (any::<Key>(), any::<u64>()).prop_map(|(key, value)| KeyValue { key, value }).boxed()
    }
}

/// Executes actions on both `Tree` and `Model`, asserting agreement after
/// every step.
#[derive(Default)]
struct Test {
    tree: Tree<u64>,
    model: Model,
}

impl Test {
    fn execute(&mut self, action: Action) {
        match action {
            Action::Insert(kv) => {
                let key = kv.key.0.clone();
                let tree_result = self.tree.insert(&key, kv.value);
                let model_result = self.model.insert(key.clone(), kv.value);
                assert_eq!(tree_result, model_result, "insert mismatch for key={key:?}");
            }
            Action::Get(key) => {
                let key_bytes = key.0.clone();
                assert_eq!(
                    self.tree.get(&key_bytes),
                    self.model.get(&key_bytes),
                    "get mismatch for key={key_bytes:?}"
                );
            }
            Action::Remove(key) => {
                let key_bytes = key.0.clone();
                let tree_result = self.tree.remove(&key_bytes);
                let model_result = self.model.remove(&key_bytes);
                assert_eq!(tree_result, model_result, "remove mismatch for key={key_bytes:?}");
            }
            Action::IterPrefix(key) => {
                let prefix = key.0.clone();
                let got: Vec<(Vec<u8>, u64)> = self.tree.iter_prefix(&prefix).map(|(k, v)| (k.to_vec(), *v)).collect();
                let want = self.model.prefix(&prefix);
                assert_eq!(got, want, "iter_prefix mismatch for prefix={prefix:?}");
            }
        }

        assert_eq!(self.tree.len(), self.model.len(), "len mismatch after action");
        assert_eq!(self.tree.is_empty(), self.model.is_empty(), "is_empty mismatch after action");
        assert_eq!(
            self.tree.minimum().map(|(k, v)| (k.to_vec(), *v)),
            self.model.minimum().map(|(k, v)| (k.to_vec(), *v)),
            "minimum mismatch after action"
        );
        assert_eq!(
            self.tree.maximum().map(|(k, v)| (k.to_vec(), *v)),
            self.model.maximum().map(|(k, v)| (k.to_vec(), *v)),
            "maximum mismatch after action"
        );
        assert!(self.tree.verify_integrity().is_empty(), "{:?}", self.tree.verify_integrity());

        let mut full: Vec<(Vec<u8>, u64)> = self.tree.iter().map(|(k, v)| (k.to_vec(), *v)).collect();
        let mut want_full: Vec<(Vec<u8>, u64)> = self.model.map.iter().map(|(k, v)| (k.clone(), *v)).collect();
        full.sort();
        want_full.sort();
        assert_eq!(full, want_full, "full iteration mismatch after action");
    }
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        failure_persistence: None,
        ..ProptestConfig::default()
    })]

    #[test]
    fn matches_btreemap(actions in prop::collection::vec(any::<Action>(), 1..64)) {
        let mut test = Test::default();
        for action in actions {
            test.execute(action);
        }
    }
}
