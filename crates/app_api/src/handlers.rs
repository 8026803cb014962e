use frost_app::{AppError, ConsumptionReport, RangeParams, Result, SessionState};
use frost_core::FilterInputs;

use crate::{
    AppContext, GrowthControl, GrowthRateRequest, PresetSaveRequest, PresetSelectRequest,
    PresetsResponse, ProjectionResponse, SessionDatesRequest, SessionPriceRequest,
    SessionClosedResponse, SessionResponse, TagSubmitRequest, TagsResponse, UsageTableRequest, UsageTableResponse,
};

fn session_response(session_id: &str, state: SessionState) -> SessionResponse {
    SessionResponse {
        session_id: session_id.to_string(),
        state,
    }
}

fn projection_response(state: &SessionState) -> Result<ProjectionResponse> {
    let projection = state.projection()?;
    let controls = projection
        .rows
        .iter()
        .map(|row| GrowthControl {
            kind: row.kind,
            display_name: row.kind.display_name(),
            growth_rate: row.growth_rate,
            current_cost: row.current_cost,
        })
        .collect();
    let receipt = projection.receipt();
    Ok(ProjectionResponse {
        controls,
        projection,
        receipt,
    })
}

pub fn session_open(ctx: &AppContext, session_id: &str) -> SessionResponse {
    let state = ctx.app_state.open_session(session_id);
    session_response(session_id, state)
}

pub fn session_close(ctx: &AppContext, session_id: &str) -> Result<SessionClosedResponse> {
    ctx.app_state.close_session(session_id)?;
    Ok(SessionClosedResponse {
        session_id: session_id.to_string(),
        closed: true,
    })
}

pub fn session_get(ctx: &AppContext, session_id: &str) -> Result<SessionResponse> {
    let state = ctx.app_state.sessions.get(session_id)?;
    Ok(session_response(session_id, state))
}

pub fn session_dates(
    ctx: &AppContext,
    session_id: &str,
    req: SessionDatesRequest,
) -> Result<SessionResponse> {
    let params = RangeParams {
        range: req.range,
        start: req.start,
        end: req.end,
    };
    let (start, end) = frost_app::resolve_dates(&params, frost_app::today())?;
    let state = ctx.app_state.sessions.update(session_id, |state| {
        state.set_dates(start, end)?;
        Ok(state.clone())
    })?;
    Ok(session_response(session_id, state))
}

pub fn session_price(
    ctx: &AppContext,
    session_id: &str,
    req: SessionPriceRequest,
) -> Result<SessionResponse> {
    let state = ctx.app_state.sessions.update(session_id, |state| {
        state.set_price(req.price_per_credit)?;
        Ok(state.clone())
    })?;
    Ok(session_response(session_id, state))
}

pub fn query_all(ctx: &AppContext, session_id: &str) -> Result<SessionResponse> {
    let state = ctx.app_state.sessions.update(session_id, |state| {
        state.query_all();
        Ok(state.clone())
    })?;
    Ok(session_response(session_id, state))
}

pub fn tags_list(ctx: &AppContext, session_id: &str) -> Result<TagsResponse> {
    let state = ctx.app_state.sessions.get(session_id)?;
    let tags = ctx.app_state.services.tags.list()?;
    Ok(TagsResponse {
        tags,
        selected_tag: state.selected_tag,
    })
}

pub fn tag_submit(
    ctx: &AppContext,
    session_id: &str,
    req: TagSubmitRequest,
) -> Result<SessionResponse> {
    let state = ctx.app_state.sessions.update(session_id, |state| {
        state.submit_tag(req.tag.as_deref());
        Ok(state.clone())
    })?;
    Ok(session_response(session_id, state))
}

pub fn presets_list(ctx: &AppContext, session_id: &str) -> Result<PresetsResponse> {
    let state = ctx.app_state.sessions.get(session_id)?;
    let presets = ctx.app_state.services.presets.list()?;
    Ok(PresetsResponse {
        presets,
        selected_preset: state.selected_preset,
    })
}

pub fn preset_select(
    ctx: &AppContext,
    session_id: &str,
    req: PresetSelectRequest,
) -> Result<SessionResponse> {
    ctx.app_state.sessions.get(session_id)?;
    let inputs = ctx.app_state.services.presets.load_inputs(&req.name)?;
    let state = ctx.app_state.sessions.update(session_id, |state| {
        state.load_preset(&req.name, inputs);
        Ok(state.clone())
    })?;
    Ok(session_response(session_id, state))
}

pub fn preset_save(
    ctx: &AppContext,
    session_id: &str,
    req: PresetSaveRequest,
) -> Result<SessionResponse> {
    let current = ctx.app_state.sessions.get(session_id)?;
    let inputs = FilterInputs {
        selected_tag: current.selected_tag,
        ..req.inputs
    };
    let preset = ctx.app_state.services.presets.save(&req.name, &inputs)?;
    let state = ctx.app_state.sessions.update(session_id, |state| {
        state.submit_filter(&preset.name, inputs);
        Ok(state.clone())
    })?;
    Ok(session_response(session_id, state))
}

pub fn consumption(ctx: &AppContext, session_id: &str) -> Result<ConsumptionReport> {
    let state = ctx.app_state.sessions.get(session_id)?;
    ctx.app_state.services.dashboard.consumption(&state)
}

pub fn usage_table(
    ctx: &AppContext,
    session_id: &str,
    req: UsageTableRequest,
) -> Result<UsageTableResponse> {
    let state = ctx.app_state.sessions.get(session_id)?;
    let table = ctx
        .app_state
        .services
        .dashboard
        .usage_table(&state, req.kind)?;
    let records = table.records(req.kind);
    Ok(UsageTableResponse {
        kind: req.kind,
        display_name: req.kind.display_name(),
        table,
        records,
    })
}

pub fn prediction_generate(ctx: &AppContext, session_id: &str) -> Result<ProjectionResponse> {
    ctx.app_state.sessions.update(session_id, |state| {
        ctx.app_state.services.dashboard.generate_prediction(state)?;
        projection_response(state)
    })
}

pub fn growth_rate_set(
    ctx: &AppContext,
    session_id: &str,
    req: GrowthRateRequest,
) -> Result<ProjectionResponse> {
    ctx.app_state.sessions.update(session_id, |state| {
        let projectable = state
            .prediction
            .as_ref()
            .is_some_and(|prediction| prediction.cost(req.kind) > 0.0);
        if !projectable {
            return Err(AppError::InvalidInput(format!(
                "{} has no cost to project",
                req.kind.display_name()
            )));
        }
        state.set_growth_rate(req.kind, req.rate)?;
        projection_response(state)
    })
}

pub fn projection(ctx: &AppContext, session_id: &str) -> Result<ProjectionResponse> {
    let state = ctx.app_state.sessions.get(session_id)?;
    projection_response(&state)
}
