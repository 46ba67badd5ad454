use chrono::{DateTime, Utc};
use shared::domain::{Contact, ContactId};

#[derive(Debug, Clone, Copy)]
pub struct DemoContact {
    pub first: &'static str,
    pub last: &'static str,
    pub twitter: &'static str,
    pub favorite: bool,
}

impl DemoContact {
    pub fn to_contact(&self, id: ContactId, created_at: DateTime<Utc>) -> Contact {
        Contact {
            first: Some(self.first.to_string()),
            last: Some(self.last.to_string()),
            avatar: Some(format!(
                "https://api.dicebear.com/9.x/initials/svg?seed={}+{}",
                self.first, self.last
            )),
            twitter: Some(self.twitter.to_string()),
            favorite: self.favorite,
            ..Contact::empty(id, created_at)
        }
    }
}

pub fn demo_contacts() -> Vec<DemoContact> {
    vec![
        DemoContact {
            first: "Ada",
            last: "Lovelace",
            twitter: "@analytical_ada",
            favorite: true,
        },
        DemoContact {
            first: "Grace",
            last: "Hopper",
            twitter: "@nanosecond",
            favorite: false,
        },
        DemoContact {
            first: "Alan",
            last: "Turing",
            twitter: "@bombe",
            favorite: false,
        },
        DemoContact {
            first: "Edsger",
            last: "Dijkstra",
            twitter: "@shortest_path",
            favorite: false,
        },
        DemoContact {
            first: "Barbara",
            last: "Liskov",
            twitter: "@substitution",
            favorite: true,
        },
        DemoContact {
            first: "Donald",
            last: "Knuth",
            twitter: "@taocp",
            favorite: false,
        },
        DemoContact {
            first: "Frances",
            last: "Allen",
            twitter: "@optimizer",
            favorite: false,
        },
        DemoContact {
            first: "Ken",
            last: "Thompson",
            twitter: "@unix_ken",
            favorite: false,
        },
    ]
}
