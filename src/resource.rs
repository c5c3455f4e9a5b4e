//! Known resource kinds.
//!
//! Each kind is a struct with one [`Object`] per declared attribute, plus a
//! variant in the closed [`Resource`] enum. [`ResourceKind`] maps response
//! discriminators to kinds.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::object::{materialize, Object};
use crate::types::DISCRIMINATOR;

macro_rules! attr_key {
    ($field:ident) => {
        stringify!($field)
    };
    ($field:ident = $key:tt) => {
        $key
    };
}

macro_rules! resource_kinds {
    ($(
        $(#[$meta:meta])*
        $variant:ident($discriminator:literal) {
            $( $field:ident $(= $key:tt)? ),* $(,)?
        }
    )*) => {
        $(
            $(#[$meta])*
            #[derive(Debug, Clone, Default, PartialEq, Serialize)]
            pub struct $variant {
                pub object: Object,
                $(
                    $(#[serde(rename = $key)])?
                    pub $field: Object,
                )*
            }

            impl $variant {
                /// Discriminator value naming this kind.
                pub const OBJECT: &'static str = $discriminator;

                /// Declared attribute names, discriminator included.
                pub const ATTRIBUTES: &'static [&'static str] =
                    &[DISCRIMINATOR, $( attr_key!($field $(= $key)?) ),*];

                fn from_fields(raw: &Map<String, Value>) -> Self {
                    Self {
                        object: Object::String($discriminator.to_string()),
                        $( $field: attribute(raw, attr_key!($field $(= $key)?)), )*
                    }
                }

                fn to_map(&self) -> Map<String, Value> {
                    let mut map = Map::new();
                    map.insert(DISCRIMINATOR.to_string(), Value::String($discriminator.to_string()));
                    $( map.insert(attr_key!($field $(= $key)?).to_string(), self.$field.to_value()); )*
                    map
                }

                fn attribute(&self, name: &str) -> Option<&Object> {
                    if name == DISCRIMINATOR {
                        return Some(&self.object);
                    }
                    $(
                        if name == attr_key!($field $(= $key)?) {
                            return Some(&self.$field);
                        }
                    )*
                    None
                }
            }

            impl TryFrom<Resource> for $variant {
                type Error = Resource;

                fn try_from(resource: Resource) -> Result<Self, Self::Error> {
                    match resource {
                        Resource::$variant(inner) => Ok(inner),
                        other => Err(other),
                    }
                }
            }
        )*

        /// Kind of a typed resource, selected by the response discriminator.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum ResourceKind {
            $( $variant, )*
        }

        impl ResourceKind {
            pub const ALL: &'static [ResourceKind] = &[ $( ResourceKind::$variant, )* ];

            /// Look up the kind named by a discriminator value.
            ///
            /// Returns `None` for values this library does not know.
            pub fn from_discriminator(s: &str) -> Option<Self> {
                match s {
                    $( $discriminator => Some(ResourceKind::$variant), )*
                    _ => None,
                }
            }

            pub fn discriminator(&self) -> &'static str {
                match self {
                    $( ResourceKind::$variant => $variant::OBJECT, )*
                }
            }

            pub fn attributes(&self) -> &'static [&'static str] {
                match self {
                    $( ResourceKind::$variant => $variant::ATTRIBUTES, )*
                }
            }

            /// Build a resource of this kind from a raw mapping.
            pub fn build(&self, raw: &Map<String, Value>) -> Resource {
                match self {
                    $( ResourceKind::$variant => Resource::$variant($variant::from_fields(raw)), )*
                }
            }
        }

        /// A typed resource.
        #[derive(Debug, Clone, PartialEq, Serialize)]
        #[serde(untagged)]
        pub enum Resource {
            $( $variant($variant), )*
        }

        impl Resource {
            pub fn kind(&self) -> ResourceKind {
                match self {
                    $( Resource::$variant(_) => ResourceKind::$variant, )*
                }
            }

            /// Value of a declared attribute, `None` if the kind has no such attribute.
            pub fn get(&self, name: &str) -> Option<&Object> {
                match self {
                    $( Resource::$variant(inner) => inner.attribute(name), )*
                }
            }

            /// Convert back to the wire shape, discriminator included.
            pub fn to_value(&self) -> Value {
                let map = match self {
                    $( Resource::$variant(inner) => inner.to_map(), )*
                };
                Value::Object(map)
            }
        }
    };
}

fn attribute(raw: &Map<String, Value>, name: &str) -> Object {
    raw.get(name).map(materialize).unwrap_or_default()
}

resource_kinds! {
    /// A single-use card or bank account token.
    Token("token") {
        id,
        bank_account,
        card,
        client_ip,
        created,
        livemode,
        type_ = "type",
        used,
    }

    Card("card") {
        id,
        account,
        address_city,
        address_country,
        address_line1,
        address_line2,
        address_state,
        address_zip,
        brand,
        country,
        customer,
        cvc_check,
        exp_month,
        exp_year,
        fingerprint,
        funding,
        last4,
        metadata,
        name,
    }

    BankAccount("bank_account") {
        id,
        account,
        account_holder_name,
        account_holder_type,
        bank_name,
        country,
        currency,
        customer,
        fingerprint,
        last4,
        metadata,
        routing_number,
        status,
    }

    Customer("customer") {
        id,
        balance,
        created,
        currency,
        default_source,
        deleted,
        description,
        email,
        invoice_prefix,
        livemode,
        metadata,
        name,
        phone,
        shipping,
        sources,
    }

    Charge("charge") {
        id,
        amount,
        amount_refunded,
        captured,
        created,
        currency,
        customer,
        description,
        failure_code,
        failure_message,
        livemode,
        metadata,
        paid,
        refunded,
        refunds,
        source,
        status,
    }

    Refund("refund") {
        id,
        amount,
        charge,
        created,
        currency,
        metadata,
        reason,
        status,
    }

    /// An uploaded file.
    File("file") {
        id,
        created,
        filename,
        purpose,
        size,
        type_ = "type",
        url,
    }

    /// A page of resources.
    List("list") {
        data,
        has_more,
        total_count,
        url,
    }
}
