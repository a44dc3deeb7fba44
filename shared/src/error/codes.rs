//! Unified error codes for FlashDrop Market
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Permission errors
//! - 4xxx: Order errors
//! - 6xxx: Product errors
//! - 8xxx: User errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values so the storefront can
/// branch on them without parsing the (French) message text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,
    /// Invalid request
    InvalidRequest = 5,

    // ==================== 1xxx: Auth ====================
    /// No valid session
    NotAuthenticated = 1001,
    /// Invalid credentials (email/password)
    InvalidCredentials = 1002,
    /// Token has expired
    TokenExpired = 1003,
    /// Token is invalid
    TokenInvalid = 1004,
    /// Password too short
    PasswordTooShort = 1005,

    // ==================== 2xxx: Permission ====================
    /// Permission denied
    PermissionDenied = 2001,
    /// Admin role required
    AdminRequired = 2003,
    /// Admins cannot modify or delete their own account
    CannotModifySelf = 2004,

    // ==================== 4xxx: Order ====================
    /// Order not found
    OrderNotFound = 4001,
    /// Order left PENDING already (confirmed, rejected or expired)
    OrderNotPending = 4002,
    /// Order has no items
    OrderEmpty = 4007,
    /// Rejection reason missing
    RejectionReasonRequired = 4008,
    /// Payment reference missing for a customer confirmation
    PaymentRefRequired = 4009,

    // ==================== 6xxx: Product ====================
    /// Product not found
    ProductNotFound = 6001,
    /// Product has invalid price
    ProductInvalidPrice = 6002,
    /// Not enough stock to satisfy the requested quantity
    InsufficientStock = 6003,
    /// Product referenced by existing orders
    ProductInUse = 6004,

    // ==================== 8xxx: User ====================
    /// User not found
    UserNotFound = 8001,
    /// Email already registered
    EmailAlreadyExists = 8002,
    /// User still owns orders
    UserHasOrders = 8003,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Database error
    DatabaseError = 9002,
    /// Configuration error
    ConfigError = 9005,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Check if this is a success code
    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, ErrorCode::Success)
    }

    /// Default user-facing message
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Opération réussie",
            ErrorCode::Unknown => "Une erreur inconnue est survenue",
            ErrorCode::ValidationFailed => "Données invalides",
            ErrorCode::NotFound => "Ressource non trouvée",
            ErrorCode::AlreadyExists => "La ressource existe déjà",
            ErrorCode::InvalidRequest => "Requête invalide",

            // Auth
            ErrorCode::NotAuthenticated => "Authentification requise",
            ErrorCode::InvalidCredentials => "Email ou mot de passe incorrect",
            ErrorCode::TokenExpired => "Session expirée, veuillez vous reconnecter",
            ErrorCode::TokenInvalid => "Jeton d'authentification invalide",
            ErrorCode::PasswordTooShort => {
                "Le mot de passe doit contenir au moins 6 caractères"
            }

            // Permission
            ErrorCode::PermissionDenied => "Accès non autorisé",
            ErrorCode::AdminRequired => "Rôle administrateur requis",
            ErrorCode::CannotModifySelf => "Vous ne pouvez pas modifier votre propre compte",

            // Order
            ErrorCode::OrderNotFound => "Commande non trouvée",
            ErrorCode::OrderNotPending => "Cette commande n'est plus en attente",
            ErrorCode::OrderEmpty => "La commande ne contient aucun article",
            ErrorCode::RejectionReasonRequired => "La raison du rejet est requise",
            ErrorCode::PaymentRefRequired => "La référence de paiement est requise",

            // Product
            ErrorCode::ProductNotFound => "Produit non trouvé",
            ErrorCode::ProductInvalidPrice => "Le prix du produit est invalide",
            ErrorCode::InsufficientStock => "Stock insuffisant",
            ErrorCode::ProductInUse => {
                "Impossible de supprimer ce produit car il est lié à des commandes"
            }

            // User
            ErrorCode::UserNotFound => "Utilisateur non trouvé",
            ErrorCode::EmailAlreadyExists => "Cet email est déjà utilisé",
            ErrorCode::UserHasOrders => {
                "Impossible de supprimer cet utilisateur car il possède des commandes"
            }

            // System
            ErrorCode::InternalError => "Erreur interne du serveur",
            ErrorCode::DatabaseError => "Erreur de base de données",
            ErrorCode::ConfigError => "Erreur de configuration",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "E{:04}", self.code())
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error returned when converting an unknown u16 into an [`ErrorCode`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            0 => Ok(ErrorCode::Success),
            1 => Ok(ErrorCode::Unknown),
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            4 => Ok(ErrorCode::AlreadyExists),
            5 => Ok(ErrorCode::InvalidRequest),

            // Auth
            1001 => Ok(ErrorCode::NotAuthenticated),
            1002 => Ok(ErrorCode::InvalidCredentials),
            1003 => Ok(ErrorCode::TokenExpired),
            1004 => Ok(ErrorCode::TokenInvalid),
            1005 => Ok(ErrorCode::PasswordTooShort),

            // Permission
            2001 => Ok(ErrorCode::PermissionDenied),
            2003 => Ok(ErrorCode::AdminRequired),
            2004 => Ok(ErrorCode::CannotModifySelf),

            // Order
            4001 => Ok(ErrorCode::OrderNotFound),
            4002 => Ok(ErrorCode::OrderNotPending),
            4007 => Ok(ErrorCode::OrderEmpty),
            4008 => Ok(ErrorCode::RejectionReasonRequired),
            4009 => Ok(ErrorCode::PaymentRefRequired),

            // Product
            6001 => Ok(ErrorCode::ProductNotFound),
            6002 => Ok(ErrorCode::ProductInvalidPrice),
            6003 => Ok(ErrorCode::InsufficientStock),
            6004 => Ok(ErrorCode::ProductInUse),

            // User
            8001 => Ok(ErrorCode::UserNotFound),
            8002 => Ok(ErrorCode::EmailAlreadyExists),
            8003 => Ok(ErrorCode::UserHasOrders),

            // System
            9001 => Ok(ErrorCode::InternalError),
            9002 => Ok(ErrorCode::DatabaseError),
            9005 => Ok(ErrorCode::ConfigError),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}
