//! The permission catalog: the closed set of `<module>:<verb>` tokens.
//!
//! Tokens are a closed enum, so a route declaring a permission that does not
//! exist in the catalog is a compile error, not a runtime surprise. The
//! catalog is open for extension on data only: adding a token means adding
//! one line to the `permissions!` invocation (and an entry in the role grant
//! table); evaluator logic never changes.

use serde::Deserialize as _;
use serde::de::Error as _;

macro_rules! permissions {
    ( $( $variant:ident => $token:literal ),+ $(,)? ) => {
        /// A permission token of shape `<module>:<verb>`.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub enum Permission {
            $( $variant, )+
        }

        impl Permission {
            /// The complete, enumerable catalog.
            pub const ALL: &'static [Permission] = &[ $( Permission::$variant, )+ ];

            #[must_use]
            pub fn as_str(self) -> &'static str {
                match self {
                    $( Permission::$variant => $token, )+
                }
            }
        }

        impl std::str::FromStr for Permission {
            type Err = UnknownPermission;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $( $token => Ok(Permission::$variant), )+
                    other => Err(UnknownPermission(other.to_owned())),
                }
            }
        }
    };
}

permissions! {
    // companyGroup
    CompanyGroupCreate => "companyGroup:create",
    CompanyGroupRead => "companyGroup:read",
    CompanyGroupUpdate => "companyGroup:update",
    CompanyGroupDelete => "companyGroup:delete",
    CompanyGroupList => "companyGroup:list",
    // company
    CompanyCreate => "company:create",
    CompanyRead => "company:read",
    CompanyUpdate => "company:update",
    CompanyDelete => "company:delete",
    CompanyList => "company:list",
    // unit
    UnitCreate => "unit:create",
    UnitRead => "unit:read",
    UnitUpdate => "unit:update",
    UnitDelete => "unit:delete",
    UnitList => "unit:list",
    // base
    BaseCreate => "base:create",
    BaseRead => "base:read",
    BaseUpdate => "base:update",
    BaseDelete => "base:delete",
    BaseList => "base:list",
    // ambulance
    AmbulanceCreate => "ambulance:create",
    AmbulanceRead => "ambulance:read",
    AmbulanceUpdate => "ambulance:update",
    AmbulanceDelete => "ambulance:delete",
    AmbulanceList => "ambulance:list",
    AmbulanceSwitchStatus => "ambulance:switchStatus",
    // ambulanceDocuments
    AmbulanceDocumentsCreate => "ambulanceDocuments:create",
    AmbulanceDocumentsRead => "ambulanceDocuments:read",
    AmbulanceDocumentsUpdate => "ambulanceDocuments:update",
    AmbulanceDocumentsDelete => "ambulanceDocuments:delete",
    AmbulanceDocumentsBulkUpdate => "ambulanceDocuments:bulkUpdate",
    // user
    UserCreate => "user:create",
    UserRead => "user:read",
    UserUpdate => "user:update",
    UserDelete => "user:delete",
    UserList => "user:list",
    // chat
    ChatCreate => "chat:create",
    ChatRead => "chat:read",
    ChatList => "chat:list",
    // absolute override, held only by sys admins
    SysAdminAccessAll => "sysAdmin:accessAll",
}

impl Permission {
    /// The `<module>` part of the token.
    #[must_use]
    pub fn module(self) -> &'static str {
        let token = self.as_str();
        token.split_once(':').map_or(token, |(module, _)| module)
    }

    /// True if `token` names a catalog member.
    #[must_use]
    pub fn is_valid(token: &str) -> bool {
        token.parse::<Permission>().is_ok()
    }
}

impl std::fmt::Display for Permission {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl serde::Serialize for Permission {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> serde::Deserialize<'de> for Permission {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(D::Error::custom)
    }
}

/// Error returned when parsing a token outside the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownPermission(pub String);

impl std::fmt::Display for UnknownPermission {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown permission token: {}", self.0)
    }
}

impl std::error::Error for UnknownPermission {}
