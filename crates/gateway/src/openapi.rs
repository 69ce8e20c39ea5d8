//! OpenAPI documentation.

use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};

use crate::handlers::admin_handler::{
    BonusConfigResponse, DiscountConfigResponse, FeaturedConfigResponse, FeaturedToggleRequest,
    ToggleResponse,
};
use crate::handlers::auth_handler::{
    CheckEmailRequest, CompleteRegistrationRequest, PhoneRequest, VerifyOtpRequest,
};
use crate::handlers::health_handler::{HealthResponse, ServiceHealth, ServiceStatus};
use crate::handlers::notification_handler::{
    InboxResponse, MarkAllReadResponse, MarkReadRequest, PushTokenRequest, PushTokenResponse,
    SettingsResponse,
};
use crate::handlers::profile_handler::{
    ProfileResponse, UpdateDiopterRequest, UpdateProfileRequest,
};
use crate::handlers::records_handler::CompaniesResponse;
use crate::handlers::reservation_handler::{
    CancelReservationRequest, CreateReservationRequest, ReservationResponse, TimeSlotsRequest,
    UpdateReservationRequest,
};
use crate::handlers::MessageResponse;
use domain::featured::{
    FeaturedBrand, FeaturedBrandUpdate, FeaturedContent, FeaturedContentUpdate, FeaturedDesign,
    FeaturedDesignUpdate, FeaturedTiming,
};
use domain::records::company::Company;
use domain::records::glasses::{Glasses, WarrantyStatus};
use domain::records::review::{Review, ReviewStatus};
use domain::{
    BonusConfig, BonusGrant, BonusUpdate, CustomerInfo, DiopterData, DiscountConfig,
    FeaturedActionConfig, FeaturedActionUpdate, FeaturedActionView, NotificationSettings,
    NotificationSettingsInput, NotificationView, OrderProduct, OrderRequest, Reservation,
    TimeSlot, TransactionView, UserProfile,
};
use loyalty_service_lib::service::{
    AppBonusOutcome, BonusMember, EmailAvailability, NotificationInbox, OrderPlaced, OtpSent,
    OtpVerification, PhoneCheck, Registration, TokenResponse,
};

/// API documentation struct.
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::health_handler::health_check,
        crate::handlers::auth_handler::phone_login_or_register,
        crate::handlers::auth_handler::send_otp,
        crate::handlers::auth_handler::verify_otp,
        crate::handlers::auth_handler::check_email,
        crate::handlers::auth_handler::complete_registration,
        crate::handlers::config_handler::bonus_config,
        crate::handlers::config_handler::discount_config,
        crate::handlers::config_handler::featured_action,
        crate::handlers::records_handler::companies,
        crate::handlers::records_handler::user_glasses,
        crate::handlers::records_handler::review_history,
        crate::handlers::profile_handler::get_profile,
        crate::handlers::profile_handler::update_profile,
        crate::handlers::profile_handler::update_diopter,
        crate::handlers::profile_handler::claim_app_bonus,
        crate::handlers::notification_handler::get_settings,
        crate::handlers::notification_handler::update_settings,
        crate::handlers::notification_handler::list_notifications,
        crate::handlers::notification_handler::mark_read,
        crate::handlers::notification_handler::mark_all_read,
        crate::handlers::notification_handler::update_push_token,
        crate::handlers::ledger_handler::last_transactions,
        crate::handlers::ledger_handler::all_transactions,
        crate::handlers::ledger_handler::send_order,
        crate::handlers::reservation_handler::time_slots,
        crate::handlers::reservation_handler::create_reservation,
        crate::handlers::reservation_handler::user_reservations,
        crate::handlers::reservation_handler::update_reservation,
        crate::handlers::reservation_handler::cancel_reservation,
        crate::handlers::admin_handler::update_bonus_config,
        crate::handlers::admin_handler::toggle_bonus,
        crate::handlers::admin_handler::update_discount_config,
        crate::handlers::admin_handler::update_featured_action,
        crate::handlers::admin_handler::toggle_featured_action,
    ),
    components(
        schemas(
            HealthResponse,
            ServiceStatus,
            ServiceHealth,
            MessageResponse,
            PhoneRequest,
            VerifyOtpRequest,
            CheckEmailRequest,
            CompleteRegistrationRequest,
            PhoneCheck,
            OtpSent,
            OtpVerification,
            EmailAvailability,
            Registration,
            TokenResponse,
            UserProfile,
            DiopterData,
            ProfileResponse,
            UpdateProfileRequest,
            UpdateDiopterRequest,
            AppBonusOutcome,
            BonusMember,
            BonusConfig,
            BonusUpdate,
            BonusGrant,
            BonusConfigResponse,
            ToggleResponse,
            DiscountConfig,
            DiscountConfigResponse,
            FeaturedActionConfig,
            FeaturedActionUpdate,
            FeaturedActionView,
            FeaturedContent,
            FeaturedBrand,
            FeaturedDesign,
            FeaturedTiming,
            FeaturedContentUpdate,
            FeaturedBrandUpdate,
            FeaturedDesignUpdate,
            FeaturedConfigResponse,
            FeaturedToggleRequest,
            NotificationSettings,
            NotificationSettingsInput,
            NotificationView,
            NotificationInbox,
            SettingsResponse,
            InboxResponse,
            MarkReadRequest,
            MarkAllReadResponse,
            PushTokenRequest,
            PushTokenResponse,
            TransactionView,
            OrderRequest,
            OrderProduct,
            CustomerInfo,
            OrderPlaced,
            TimeSlot,
            Reservation,
            TimeSlotsRequest,
            CreateReservationRequest,
            UpdateReservationRequest,
            CancelReservationRequest,
            ReservationResponse,
            Glasses,
            WarrantyStatus,
            Review,
            ReviewStatus,
            Company,
            CompaniesResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Phone sign-in with one-time codes"),
        (name = "Profile", description = "Member profile and prescription"),
        (name = "Notifications", description = "Inbox, preferences and push token"),
        (name = "Points", description = "Loyalty ledger and shop orders"),
        (name = "Reservations", description = "Eye exam booking"),
        (name = "Records", description = "Purchases, exams and partner companies"),
        (name = "Configuration", description = "Public app settings"),
        (name = "Admin", description = "Settings management, admin only"),
        (name = "Health", description = "Dependency status"),
    )
)]
pub struct ApiDoc;

/// Security scheme modifier.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}
