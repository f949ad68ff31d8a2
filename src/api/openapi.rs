//! OpenAPI documentation configuration.
//!
//! Provides Swagger UI for API exploration and testing.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::api::handlers::{
    auth_handler, booking_handler, city_handler, country_handler, facility_handler,
    hotel_handler, image_handler, room_handler, user_handler,
};
use crate::domain::{
    Booking, BookingDates, BookingInput, BookingPatch, City, CityInput, CityPatch, Country,
    CountryInput, CountryPatch, Facility, FacilityInput, FacilityPatch, Hotel, HotelInput,
    HotelPatch, Image, ImageInput, ImagePatch, Room, RoomInput, RoomPatch, UserPatch,
    UserResponse, UserUpdate,
};
use crate::services::TokenResponse;
use crate::types::StatusResponse;

/// OpenAPI documentation for the hotel booking API
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Hotel Booking API",
        version = "0.1.0",
        description = "Hotels, rooms and bookings with their location and facility catalog",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    servers(
        (url = "http://localhost:8000", description = "Local development server")
    ),
    paths(
        auth_handler::register,
        auth_handler::login,
        auth_handler::me,
        user_handler::list_users,
        user_handler::get_user,
        user_handler::update_user,
        user_handler::patch_user,
        user_handler::delete_user,
        country_handler::list_countries,
        country_handler::get_country,
        country_handler::create_country,
        country_handler::update_country,
        country_handler::patch_country,
        country_handler::delete_country,
        city_handler::list_cities,
        city_handler::get_city,
        city_handler::create_city,
        city_handler::update_city,
        city_handler::patch_city,
        city_handler::delete_city,
        hotel_handler::list_hotels,
        hotel_handler::get_hotel,
        hotel_handler::create_hotel,
        hotel_handler::update_hotel,
        hotel_handler::patch_hotel,
        hotel_handler::delete_hotel,
        room_handler::list_rooms,
        room_handler::get_room,
        room_handler::create_room,
        room_handler::update_room,
        room_handler::patch_room,
        room_handler::delete_room,
        booking_handler::list_bookings,
        booking_handler::list_my_bookings,
        booking_handler::get_booking,
        booking_handler::create_booking,
        booking_handler::update_booking,
        booking_handler::patch_booking,
        booking_handler::delete_booking,
        facility_handler::list_facilities,
        facility_handler::get_facility,
        facility_handler::create_facility,
        facility_handler::update_facility,
        facility_handler::patch_facility,
        facility_handler::delete_facility,
        image_handler::list_images,
        image_handler::get_image,
        image_handler::create_image,
        image_handler::update_image,
        image_handler::patch_image,
        image_handler::delete_image,
    ),
    components(
        schemas(
            StatusResponse,
            TokenResponse,
            auth_handler::RegisterRequest,
            auth_handler::LoginRequest,
            UserResponse,
            UserUpdate,
            UserPatch,
            Country,
            CountryInput,
            CountryPatch,
            City,
            CityInput,
            CityPatch,
            Hotel,
            HotelInput,
            HotelPatch,
            Room,
            RoomInput,
            RoomPatch,
            Booking,
            BookingInput,
            BookingDates,
            BookingPatch,
            Facility,
            FacilityInput,
            FacilityPatch,
            Image,
            ImageInput,
            ImagePatch,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Registration, login and the current user"),
        (name = "Users", description = "User profiles"),
        (name = "Countries", description = "Countries"),
        (name = "Cities", description = "Cities within countries"),
        (name = "Hotels", description = "Hotels"),
        (name = "Rooms", description = "Rooms of a hotel"),
        (name = "Bookings", description = "Room bookings"),
        (name = "Facilities", description = "Facilities offered by hotels and rooms"),
        (name = "Images", description = "Hotel images")
    )
)]
pub struct ApiDoc;

/// Security scheme modifier for JWT Bearer authentication
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
                        .description(Some("JWT token obtained from /auth/login"))
                        .build(),
                ),
            );
        }
    }
}
