//! REST request handlers.
//!
//! Each handler authenticates (where required) via the [`Caller`] extractor,
//! converts DTOs, and delegates to a core service. Permission and state
//! rules all live in `medeasy-core`; handlers only translate.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use uuid::Uuid;

use crate::auth::Caller;
use crate::dto::{
    AppointmentRes, DoctorRes, EditAppointmentReq, ErrorRes, HealthRes, LoginReq, LoginRes,
    RecordActionReq, RecordsRes, RegisterDoctorReq, RegisterPatientReq, RegisteredRes,
    ScheduleReq,
};
use crate::error::ApiError;
use crate::AppState;

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Health check response", body = HealthRes)
    )
)]
/// Health check endpoint for monitoring and load balancers.
pub async fn health(State(_state): State<AppState>) -> Json<HealthRes> {
    Json(HealthRes {
        ok: true,
        message: "MedEasy REST API is alive".into(),
    })
}

#[utoipa::path(
    post,
    path = "/register/paciente",
    request_body = RegisterPatientReq,
    responses(
        (status = 201, description = "Patient registered", body = RegisteredRes),
        (status = 409, description = "Email or national id already registered", body = ErrorRes),
        (status = 422, description = "Malformed fields", body = ErrorRes)
    )
)]
/// Registers a patient account.
pub async fn register_patient(
    State(state): State<AppState>,
    Json(req): Json<RegisterPatientReq>,
) -> Result<(StatusCode, Json<RegisteredRes>), ApiError> {
    let user = state.identity.register_patient(req.into())?;
    Ok((StatusCode::CREATED, Json(RegisteredRes { id: user.id })))
}

#[utoipa::path(
    post,
    path = "/register/medico",
    request_body = RegisterDoctorReq,
    responses(
        (status = 201, description = "Doctor registered", body = RegisteredRes),
        (status = 409, description = "Email or license number already registered", body = ErrorRes),
        (status = 422, description = "Malformed fields", body = ErrorRes)
    )
)]
/// Registers a doctor account.
pub async fn register_doctor(
    State(state): State<AppState>,
    Json(req): Json<RegisterDoctorReq>,
) -> Result<(StatusCode, Json<RegisteredRes>), ApiError> {
    let user = state.identity.register_doctor(req.into())?;
    Ok((StatusCode::CREATED, Json(RegisteredRes { id: user.id })))
}

#[utoipa::path(
    post,
    path = "/login",
    request_body = LoginReq,
    responses(
        (status = 200, description = "Session opened", body = LoginRes),
        (status = 401, description = "Invalid e-mail or password", body = ErrorRes)
    )
)]
/// Verifies credentials and opens a bearer-token session.
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginReq>,
) -> Result<Json<LoginRes>, ApiError> {
    let session = state.identity.authenticate(&req.email, &req.password)?;
    Ok(Json(LoginRes {
        token: session.token,
        user_id: session.user.id,
        role: session.user.role(),
        name: session.user.name,
    }))
}

#[utoipa::path(
    get,
    path = "/logout",
    responses(
        (status = 204, description = "Session closed"),
        (status = 401, description = "Not authenticated", body = ErrorRes)
    )
)]
/// Closes the caller's session, invalidating the token.
pub async fn logout(State(state): State<AppState>, caller: Caller) -> Result<StatusCode, ApiError> {
    state.identity.logout(&caller.token)?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/medicos",
    responses(
        (status = 200, description = "Doctors available for booking", body = [DoctorRes])
    )
)]
/// Lists all doctors, for the booking picker.
pub async fn list_doctors(
    State(state): State<AppState>,
) -> Result<Json<Vec<DoctorRes>>, ApiError> {
    let doctors = state
        .identity
        .list_doctors()?
        .into_iter()
        .filter_map(DoctorRes::from_user)
        .collect();
    Ok(Json(doctors))
}

#[utoipa::path(
    post,
    path = "/agendar",
    request_body = ScheduleReq,
    responses(
        (status = 201, description = "Appointment booked", body = AppointmentRes),
        (status = 403, description = "Caller is not a patient", body = ErrorRes),
        (status = 404, description = "Doctor not found", body = ErrorRes),
        (status = 422, description = "Time outside clinic hours", body = ErrorRes)
    )
)]
/// Books a new appointment. Patients only.
pub async fn schedule(
    State(state): State<AppState>,
    caller: Caller,
    Json(req): Json<ScheduleReq>,
) -> Result<(StatusCode, Json<AppointmentRes>), ApiError> {
    let appointment = state
        .appointments
        .schedule(caller.identity, req.doctor_id, req.scheduled_at)?;
    Ok((StatusCode::CREATED, Json(appointment.into())))
}

#[utoipa::path(
    get,
    path = "/consultas",
    responses(
        (status = 200, description = "The caller's appointments, newest first", body = [AppointmentRes]),
        (status = 401, description = "Not authenticated", body = ErrorRes)
    )
)]
/// Lists the caller's own appointments (as patient or as doctor).
pub async fn list_own(
    State(state): State<AppState>,
    caller: Caller,
) -> Result<Json<Vec<AppointmentRes>>, ApiError> {
    let appointments = state
        .appointments
        .list_for(caller.identity)?
        .into_iter()
        .map(Into::into)
        .collect();
    Ok(Json(appointments))
}

#[utoipa::path(
    get,
    path = "/consulta/{id}/editar",
    params(("id" = Uuid, Path, description = "Appointment id")),
    responses(
        (status = 200, description = "Current appointment data", body = AppointmentRes),
        (status = 403, description = "Caller is not a party", body = ErrorRes),
        (status = 404, description = "Appointment not found", body = ErrorRes)
    )
)]
/// Loads one appointment for its edit view. Parties only.
pub async fn get_appointment(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<Uuid>,
) -> Result<Json<AppointmentRes>, ApiError> {
    let appointment = state.appointments.get_for_party(caller.identity, id)?;
    Ok(Json(appointment.into()))
}

#[utoipa::path(
    post,
    path = "/consulta/{id}/editar",
    params(("id" = Uuid, Path, description = "Appointment id")),
    request_body = EditAppointmentReq,
    responses(
        (status = 200, description = "Appointment updated", body = AppointmentRes),
        (status = 403, description = "Caller is not a party", body = ErrorRes),
        (status = 404, description = "Appointment or doctor not found", body = ErrorRes),
        (status = 422, description = "Time outside clinic hours", body = ErrorRes)
    )
)]
/// Reassigns doctor, time, and status. Parties only.
pub async fn edit_appointment(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<Uuid>,
    Json(req): Json<EditAppointmentReq>,
) -> Result<Json<AppointmentRes>, ApiError> {
    let appointment = state.appointments.edit(caller.identity, id, req.into())?;
    Ok(Json(appointment.into()))
}

#[utoipa::path(
    post,
    path = "/consulta/{id}/confirmar",
    params(("id" = Uuid, Path, description = "Appointment id")),
    responses(
        (status = 200, description = "Appointment confirmed", body = AppointmentRes),
        (status = 403, description = "Caller is not the appointment's doctor", body = ErrorRes),
        (status = 404, description = "Appointment not found", body = ErrorRes)
    )
)]
/// Confirms an appointment. The appointment's doctor only.
pub async fn confirm(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<Uuid>,
) -> Result<Json<AppointmentRes>, ApiError> {
    let appointment = state.appointments.confirm(caller.identity, id)?;
    Ok(Json(appointment.into()))
}

#[utoipa::path(
    post,
    path = "/consulta/{id}/cancelar",
    params(("id" = Uuid, Path, description = "Appointment id")),
    responses(
        (status = 200, description = "Appointment cancelled", body = AppointmentRes),
        (status = 403, description = "Caller is not a party", body = ErrorRes),
        (status = 404, description = "Appointment not found", body = ErrorRes)
    )
)]
/// Cancels an appointment. Either party.
pub async fn cancel(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<Uuid>,
) -> Result<Json<AppointmentRes>, ApiError> {
    let appointment = state.appointments.cancel(caller.identity, id)?;
    Ok(Json(appointment.into()))
}

#[utoipa::path(
    post,
    path = "/consulta/{id}/finalizar",
    params(("id" = Uuid, Path, description = "Appointment id")),
    responses(
        (status = 200, description = "Appointment finalized", body = AppointmentRes),
        (status = 403, description = "Caller is not the appointment's doctor", body = ErrorRes),
        (status = 404, description = "Appointment not found", body = ErrorRes),
        (status = 409, description = "Appointment is not confirmed", body = ErrorRes)
    )
)]
/// Finalizes a confirmed appointment. The appointment's doctor only.
pub async fn finalize(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<Uuid>,
) -> Result<Json<AppointmentRes>, ApiError> {
    let appointment = state.appointments.finalize(caller.identity, id)?;
    Ok(Json(appointment.into()))
}

#[utoipa::path(
    get,
    path = "/consulta/{id}/evolucoes",
    params(("id" = Uuid, Path, description = "Appointment id")),
    responses(
        (status = 200, description = "Chart: notes (oldest first) and prescriptions (newest first)", body = RecordsRes),
        (status = 403, description = "Caller is not the appointment's doctor", body = ErrorRes),
        (status = 404, description = "Appointment not found", body = ErrorRes)
    )
)]
/// The doctor's chart page for an appointment.
pub async fn chart(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<Uuid>,
) -> Result<Json<RecordsRes>, ApiError> {
    let records = state.records.doctor_view(caller.identity, id)?;
    Ok(Json(records.into()))
}

#[utoipa::path(
    post,
    path = "/consulta/{id}/evolucoes",
    params(("id" = Uuid, Path, description = "Appointment id")),
    request_body = RecordActionReq,
    responses(
        (status = 201, description = "Record appended; returns the refreshed chart", body = RecordsRes),
        (status = 403, description = "Caller is not the appointment's doctor", body = ErrorRes),
        (status = 404, description = "Appointment not found", body = ErrorRes),
        (status = 422, description = "Empty content or unknown action tag", body = ErrorRes)
    )
)]
/// Appends a note or a prescription, decided by the `action` tag.
pub async fn add_record(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<Uuid>,
    Json(req): Json<RecordActionReq>,
) -> Result<(StatusCode, Json<RecordsRes>), ApiError> {
    match req {
        RecordActionReq::Note { content } => {
            state.records.add_note(caller.identity, id, &content)?;
        }
        RecordActionReq::Prescription { description } => {
            state
                .records
                .add_prescription(caller.identity, id, &description)?;
        }
    }
    let records = state.records.doctor_view(caller.identity, id)?;
    Ok((StatusCode::CREATED, Json(records.into())))
}

#[utoipa::path(
    get,
    path = "/consulta/{id}/historico",
    params(("id" = Uuid, Path, description = "Appointment id")),
    responses(
        (status = 200, description = "History: notes (oldest first) and prescriptions (newest first)", body = RecordsRes),
        (status = 403, description = "Caller is not the appointment's patient", body = ErrorRes),
        (status = 404, description = "Appointment not found", body = ErrorRes)
    )
)]
/// The patient's history page for one of their own appointments.
pub async fn history(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<Uuid>,
) -> Result<Json<RecordsRes>, ApiError> {
    let records = state.records.patient_history(caller.identity, id)?;
    Ok(Json(records.into()))
}
