// Copyright 2025 the keel authors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! A key-value map that broadcasts every mutation to subscribers.

use std::collections::HashMap;
use std::hash::Hash;

/// A change notification emitted by [`ObservableMap`].
///
/// Events carry owned copies of the affected keys and values, so subscribers
/// on other threads never borrow from the map.
#[derive(Debug, Clone, PartialEq)]
pub enum MapEvent<K, V> {
    /// A key that was not present before was added.
    Inserted {
        /// The inserted key.
        key: K,
        /// The inserted value.
        value: V,
    },
    /// An existing key was given a new value.
    Updated {
        /// The affected key.
        key: K,
        /// The value before the update.
        old: V,
        /// The value after the update.
        new: V,
    },
    /// A key was removed.
    Removed {
        /// The removed key.
        key: K,
        /// The value that was removed with it.
        value: V,
    },
    /// All entries were removed at once.
    Cleared {
        /// How many entries the map held before the clear.
        len: usize,
    },
}

/// A `HashMap` wrapper that publishes a [`MapEvent`] for every mutation.
///
/// Each call to [`subscribe`](Self::subscribe) opens an unbounded channel.
/// Subscribers that drop their receiver are pruned on the next publish, so
/// an abandoned listener never blocks or leaks indefinitely.
#[derive(Debug)]
pub struct ObservableMap<K, V> {
    entries: HashMap<K, V>,
    subscribers: Vec<flume::Sender<MapEvent<K, V>>>,
}

impl<K, V> ObservableMap<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    /// Creates an empty map with no subscribers.
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
            subscribers: Vec::new(),
        }
    }

    /// Opens a new event channel and returns its receiving end.
    ///
    /// Events are delivered in mutation order. Dropping the receiver
    /// unsubscribes implicitly.
    pub fn subscribe(&mut self) -> flume::Receiver<MapEvent<K, V>> {
        let (sender, receiver) = flume::unbounded();
        self.subscribers.push(sender);
        receiver
    }

    /// Returns how many subscribers are currently registered.
    ///
    /// Dropped receivers are only counted out once a publish has pruned them.
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    fn publish(&mut self, event: MapEvent<K, V>) {
        self.subscribers
            .retain(|sender| sender.send(event.clone()).is_ok());
    }

    /// Inserts a key-value pair, returning the previous value if any.
    ///
    /// Emits [`MapEvent::Inserted`] for a new key and [`MapEvent::Updated`]
    /// when an existing value is replaced.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        let previous = self.entries.insert(key.clone(), value.clone());
        match &previous {
            Some(old) => self.publish(MapEvent::Updated {
                key,
                old: old.clone(),
                new: value,
            }),
            None => self.publish(MapEvent::Inserted { key, value }),
        }
        previous
    }

    /// Removes a key, returning its value if it was present.
    /// Emits [`MapEvent::Removed`] on a hit; removing an absent key is silent.
    pub fn remove(&mut self, key: &K) -> Option<V> {
        let removed = self.entries.remove(key);
        if let Some(value) = &removed {
            self.publish(MapEvent::Removed {
                key: key.clone(),
                value: value.clone(),
            });
        }
        removed
    }

    /// Removes all entries.
    ///
    /// Emits a single [`MapEvent::Cleared`] carrying the old length.
    /// Clearing an already empty map emits nothing.
    pub fn clear(&mut self) {
        let len = self.entries.len();
        if len == 0 {
            return;
        }
        self.entries.clear();
        self.publish(MapEvent::Cleared { len });
    }

    /// Mutates the value under `key` in place.
    ///
    /// Returns `true` and emits [`MapEvent::Updated`] when the key exists,
    /// even if the closure left the value unchanged. Returns `false` for an
    /// absent key without calling the closure.
    pub fn modify<F>(&mut self, key: &K, mutate: F) -> bool
    where
        F: FnOnce(&mut V),
    {
        let (old, new) = match self.entries.get_mut(key) {
            Some(slot) => {
                let old = slot.clone();
                mutate(slot);
                (old, slot.clone())
            }
            None => return false,
        };
        self.publish(MapEvent::Updated {
            key: key.clone(),
            old,
            new,
        });
        true
    }

    /// Returns a reference to the value under `key`.
    pub fn get(&self, key: &K) -> Option<&V> {
        self.entries.get(key)
    }

    /// Checks whether `key` is present.
    pub fn contains_key(&self, key: &K) -> bool {
        self.entries.contains_key(key)
    }

    /// Returns the number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Checks whether the map holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over all entries in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.entries.iter()
    }

    /// Iterates over all keys in arbitrary order.
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.entries.keys()
    }

    /// Iterates over all values in arbitrary order.
    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.entries.values()
    }
}

impl<K, V> Default for ObservableMap<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    fn default() -> Self {
        Self::new()
    }
}

// --- Tests ---
#[cfg(test)]
mod tests {
    use super::*;
    use flume::TryRecvError;
    use std::time::Duration;

    #[test]
    fn test_insert_emits_inserted_then_updated() {
        let mut map = ObservableMap::new();
        let events = map.subscribe();

        assert_eq!(map.insert("hp", 100), None);
        assert_eq!(map.insert("hp", 75), Some(100));

        assert_eq!(
            events.try_recv(),
            Ok(MapEvent::Inserted {
                key: "hp",
                value: 100,
            })
        );
        assert_eq!(
            events.try_recv(),
            Ok(MapEvent::Updated {
                key: "hp",
                old: 100,
                new: 75,
            })
        );
        assert_eq!(events.try_recv(), Err(TryRecvError::Empty));
    }

    #[test]
    fn test_remove_emits_only_on_hit() {
        let mut map = ObservableMap::new();
        map.insert("mana", 50);
        let events = map.subscribe();

        assert_eq!(map.remove(&"stamina"), None);
        assert_eq!(events.try_recv(), Err(TryRecvError::Empty));

        assert_eq!(map.remove(&"mana"), Some(50));
        assert_eq!(
            events.try_recv(),
            Ok(MapEvent::Removed {
                key: "mana",
                value: 50,
            })
        );
    }

    #[test]
    fn test_clear_emits_old_len_once() {
        let mut map = ObservableMap::new();
        map.insert(1, "a");
        map.insert(2, "b");
        let events = map.subscribe();

        map.clear();
        assert!(map.is_empty());
        assert_eq!(events.try_recv(), Ok(MapEvent::Cleared { len: 2 }));

        // Clearing an empty map is silent
        map.clear();
        assert_eq!(events.try_recv(), Err(TryRecvError::Empty));
    }

    #[test]
    fn test_modify_in_place() {
        let mut map = ObservableMap::new();
        map.insert("score", 10);
        let events = map.subscribe();

        assert!(map.modify(&"score", |v| *v += 5));
        assert_eq!(map.get(&"score"), Some(&15));
        assert_eq!(
            events.try_recv(),
            Ok(MapEvent::Updated {
                key: "score",
                old: 10,
                new: 15,
            })
        );

        // Absent key: closure never runs, no event
        assert!(!map.modify(&"missing", |v| *v = 0));
        assert_eq!(events.try_recv(), Err(TryRecvError::Empty));
    }

    #[test]
    fn test_every_subscriber_sees_every_event() {
        let mut map = ObservableMap::new();
        let first = map.subscribe();
        let second = map.subscribe();
        assert_eq!(map.subscriber_count(), 2);

        map.insert("key", 1);
        for events in [&first, &second] {
            assert_eq!(
                events.recv_timeout(Duration::from_millis(100)),
                Ok(MapEvent::Inserted {
                    key: "key",
                    value: 1,
                })
            );
        }
    }

    #[test]
    fn test_dropped_subscriber_is_pruned_on_publish() {
        let mut map = ObservableMap::new();
        let keep = map.subscribe();
        let dropped = map.subscribe();
        drop(dropped);
        assert_eq!(map.subscriber_count(), 2);

        map.insert("key", 1);
        assert_eq!(map.subscriber_count(), 1);
        assert!(keep.try_recv().is_ok());
    }

    #[test]
    fn test_subscriber_on_another_thread() {
        let mut map = ObservableMap::new();
        let events = map.subscribe();

        let handle = std::thread::spawn(move || {
            events
                .recv_timeout(Duration::from_secs(1))
                .expect("event should arrive")
        });

        map.insert("threaded".to_string(), 42);
        assert_eq!(
            handle.join().expect("thread join failed"),
            MapEvent::Inserted {
                key: "threaded".to_string(),
                value: 42,
            }
        );
    }

    #[test]
    fn test_read_accessors() {
        let mut map = ObservableMap::new();
        map.insert("a", 1);
        map.insert("b", 2);

        assert_eq!(map.len(), 2);
        assert!(map.contains_key(&"a"));
        assert!(!map.contains_key(&"z"));

        let mut pairs: Vec<(&str, i32)> = map.iter().map(|(&k, &v)| (k, v)).collect();
        pairs.sort_unstable();
        assert_eq!(pairs, vec![("a", 1), ("b", 2)]);

        let mut keys: Vec<&str> = map.keys().copied().collect();
        keys.sort_unstable();
        assert_eq!(keys, vec!["a", "b"]);
        assert_eq!(map.values().sum::<i32>(), 3);
    }
}
