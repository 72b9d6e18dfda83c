//! The agent-facing tool surface.
//!
//! Each tool is a thin projection over one editor command: build the
//! [`Command`], send it through the bridge, render the reply as text. The
//! interesting behavior (validation, scene mutation) lives on the editor
//! side; this layer only decides which reply field the agent sees and how
//! failures read. Action vocabularies and user-supplied JSON are checked
//! locally in [`crate::actions`] and [`GodotMcp::godot_save_game_data`]
//! before any connection is opened.

use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{CallToolResult, Content, ServerCapabilities, ServerInfo};
use rmcp::schemars;
use rmcp::transport::stdio;
use rmcp::{ErrorData as McpError, ServerHandler, ServiceExt, tool, tool_handler, tool_router};
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use godot_mcp_bridge::{Bridge, BridgeConfig};
use godot_mcp_docs::DocsClient;
use godot_mcp_protocol::{Command, Reply};

use crate::actions::{AnimationAction, AudioAction, GameAction, GroupAction, SignalAction};

fn text(s: impl Into<String>) -> CallToolResult {
    CallToolResult::success(vec![Content::text(s.into())])
}

fn pretty(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

/// Renders a reply field the way an agent expects to read it: plain text
/// for strings, JSON for everything else, `null` when absent.
fn display(value: Option<&Value>) -> String {
    match value {
        None => "null".to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

fn pretty_reply(reply: Reply) -> String {
    pretty(&Value::Object(reply.into_inner()))
}

/// Serde defaults mirroring the editor plugin's conventions.
mod defaults {
    pub fn parent() -> String {
        ".".to_string()
    }
    pub fn res_root() -> String {
        "res://".to_string()
    }
    pub fn connect() -> String {
        "connect".to_string()
    }
    pub fn play() -> String {
        "play".to_string()
    }
    pub fn get() -> String {
        "get".to_string()
    }
    pub fn node3d() -> String {
        "Node3D".to_string()
    }
    pub fn root() -> String {
        "Root".to_string()
    }
    pub fn audio_player() -> String {
        "AudioPlayer".to_string()
    }
    pub fn player() -> String {
        "Player".to_string()
    }
    pub fn health_bar() -> String {
        "HealthBar".to_string()
    }
    pub fn coin_scene() -> String {
        "res://coin.tscn".to_string()
    }
    pub fn terrain() -> String {
        "Terrain".to_string()
    }
    pub fn terrain_shader() -> String {
        "res://terrain_material.gdshader".to_string()
    }
    pub fn full() -> String {
        "full".to_string()
    }
    pub fn height_levels() -> String {
        "0.0,0.3,0.6,1.0".to_string()
    }
    pub fn fire() -> String {
        "fire".to_string()
    }
    pub fn particles() -> String {
        "Particles".to_string()
    }
    pub fn sunny() -> String {
        "sunny".to_string()
    }
    pub fn boxed() -> String {
        "box".to_string()
    }
    pub fn primitive() -> String {
        "Primitive".to_string()
    }
    pub fn light_gray() -> String {
        "0.8,0.8,0.8".to_string()
    }
    pub fn gray() -> String {
        "0.6,0.6,0.6".to_string()
    }
    pub fn main_menu() -> String {
        "main_menu".to_string()
    }
    pub fn trigger_area() -> String {
        "TriggerArea".to_string()
    }
    pub fn rigid_body() -> String {
        "RigidBody".to_string()
    }
    pub fn save_file() -> String {
        "save.json".to_string()
    }
    pub fn empty_json() -> String {
        "{}".to_string()
    }
    pub fn neg_one() -> i64 {
        -1
    }
    pub fn one() -> f64 {
        1.0
    }
    pub fn two() -> f64 {
        2.0
    }
    pub fn five() -> f64 {
        5.0
    }
    pub fn tenth() -> f64 {
        0.1
    }
    pub fn terrain_size() -> i64 {
        32
    }
    pub fn yes() -> bool {
        true
    }
}

// --- Request payloads ---

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct NodePathRequest {
    #[schemars(description = "Path to the node (\".\" for the scene root)")]
    pub path: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ResourcePathRequest {
    #[schemars(description = "Resource path, e.g. \"res://player.gd\"")]
    pub path: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct AddNodeRequest {
    #[schemars(description = "Class name of the node, e.g. \"Sprite2D\", \"Label\"")]
    pub node_type: String,
    #[serde(default)]
    #[schemars(description = "Name for the new node")]
    pub name: String,
    #[serde(default = "defaults::parent")]
    #[schemars(description = "Path to the parent node, defaults to the scene root")]
    pub parent_path: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ExecuteCodeRequest {
    #[schemars(description = "GDScript body, wrapped in `func eval(EditorInterface):`")]
    pub code: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SetPropertyRequest {
    #[schemars(description = "Path to the node")]
    pub path: String,
    #[schemars(description = "Property name, e.g. \"position\", \"text\"")]
    pub property: String,
    #[schemars(description = "Value to set; Vector3 as \"x,y,z\"")]
    pub value: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ListResourcesRequest {
    #[serde(default = "defaults::res_root")]
    #[schemars(description = "Directory to list")]
    pub path: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct CreateScriptRequest {
    #[schemars(description = "Resource path, e.g. \"res://player.gd\"")]
    pub path: String,
    #[schemars(description = "Content of the script")]
    pub content: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ReparentNodeRequest {
    #[schemars(description = "Path to the node to move")]
    pub path: String,
    #[schemars(description = "Path to the new parent")]
    pub new_parent_path: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct InstantiateSceneRequest {
    #[schemars(description = "Scene path, e.g. \"res://enemy.tscn\"")]
    pub path: String,
    #[serde(default = "defaults::parent")]
    #[schemars(description = "Where to add the instance")]
    pub parent_path: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SaveSceneRequest {
    #[serde(default)]
    #[schemars(description = "Path to save to; empty keeps the current filename")]
    pub path: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SignalRequest {
    #[schemars(description = "Path to the source node")]
    pub source: String,
    #[schemars(description = "Signal name, e.g. \"body_entered\"")]
    pub signal: String,
    #[schemars(description = "Path to the target node")]
    pub target: String,
    #[schemars(description = "Method name, e.g. \"_on_body_entered\"")]
    pub method: String,
    #[serde(default = "defaults::connect")]
    #[schemars(description = "\"connect\" or \"disconnect\"")]
    pub action: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct GameRequest {
    #[serde(default = "defaults::play")]
    #[schemars(description = "\"play\" (F5) or \"stop\" (F8)")]
    pub action: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct InputMapRequest {
    #[schemars(description = "Name of the action, e.g. \"move_forward\"")]
    pub action: String,
    #[schemars(description = "\"key\" or \"joy\"")]
    pub event_type: String,
    #[serde(default)]
    #[schemars(description = "Key string for key events, e.g. \"W\", \"Space\"")]
    pub key: String,
    #[serde(default = "defaults::neg_one")]
    #[schemars(description = "Button index for joy events (0=A, 1=B, ...)")]
    pub joy_button: i64,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ProjectSettingRequest {
    #[schemars(description = "Setting path, e.g. \"display/window/size/viewport_width\"")]
    pub name: String,
    #[schemars(description = "Value to set, auto-converted where possible")]
    pub value: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct CreateShaderRequest {
    #[schemars(description = "Resource path, e.g. \"res://water.gdshader\"")]
    pub path: String,
    #[schemars(description = "Shader code")]
    pub code: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ApplyShaderRequest {
    #[schemars(description = "Path to the target node (MeshInstance3D, ...)")]
    pub node_path: String,
    #[schemars(description = "Path to the .gdshader file")]
    pub shader_path: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct RenameNodeRequest {
    #[schemars(description = "Path to the node to rename")]
    pub path: String,
    #[schemars(description = "New name for the node")]
    pub new_name: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct DuplicateNodeRequest {
    #[schemars(description = "Path to the node to duplicate")]
    pub path: String,
    #[serde(default)]
    #[schemars(description = "Name for the duplicate")]
    pub new_name: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct NewSceneRequest {
    #[serde(default = "defaults::node3d")]
    #[schemars(description = "Type of the root node, e.g. \"Node2D\", \"Control\"")]
    pub root_type: String,
    #[serde(default = "defaults::root")]
    #[schemars(description = "Name for the root node")]
    pub name: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ListAnimationsRequest {
    #[schemars(description = "Path to the AnimationPlayer node")]
    pub player_path: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct AnimationRequest {
    #[schemars(description = "Path to the AnimationPlayer node")]
    pub player_path: String,
    #[serde(default = "defaults::play")]
    #[schemars(description = "\"play\", \"stop\", or \"seek\"")]
    pub action: String,
    #[serde(default)]
    #[schemars(description = "Animation name (required for play)")]
    pub animation: String,
    #[serde(default)]
    #[schemars(description = "Start/seek time in seconds")]
    pub start_time: f64,
    #[serde(default)]
    #[schemars(description = "Play backwards (for seek)")]
    pub backwards: bool,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SimpleAnimationRequest {
    #[schemars(description = "Path to the AnimationPlayer node")]
    pub player_path: String,
    #[schemars(description = "Name of the animation to create")]
    pub animation_name: String,
    #[schemars(description = "Path to the node to animate, from the scene root")]
    pub node_path: String,
    #[schemars(description = "Property to animate, e.g. \"position\"")]
    pub property: String,
    #[schemars(description = "Starting value as string, e.g. \"0,0,0\"")]
    pub start_value: String,
    #[schemars(description = "Ending value as string, e.g. \"0,2,0\"")]
    pub end_value: String,
    #[serde(default = "defaults::one")]
    #[schemars(description = "Duration in seconds")]
    pub duration: f64,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct GroupRequest {
    #[schemars(description = "Path to the node")]
    pub path: String,
    #[serde(default = "defaults::get")]
    #[schemars(description = "\"add\", \"remove\", or \"get\" (list all groups)")]
    pub action: String,
    #[serde(default)]
    #[schemars(description = "Group name (required for add/remove)")]
    pub group: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct CreateAudioPlayerRequest {
    #[serde(default = "defaults::parent")]
    pub parent_path: String,
    #[serde(default = "defaults::audio_player")]
    pub name: String,
    #[serde(default)]
    #[schemars(description = "Create an AudioStreamPlayer3D instead of 2D")]
    pub is_3d: bool,
    #[serde(default)]
    #[schemars(description = "Optional audio stream to assign")]
    pub audio_path: String,
    #[serde(default)]
    pub autoplay: bool,
    #[serde(default)]
    pub play_now: bool,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct AudioRequest {
    #[schemars(description = "Path to the AudioStreamPlayer node")]
    pub path: String,
    #[serde(default = "defaults::play")]
    #[schemars(description = "\"play\" or \"stop\"")]
    pub action: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct BusVolumeRequest {
    #[schemars(description = "Bus name, e.g. \"Master\"")]
    pub bus: String,
    #[schemars(description = "Volume in dB, e.g. -6.0")]
    pub volume_db: f64,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct AttachScriptRequest {
    #[schemars(description = "Path to the node")]
    pub node_path: String,
    #[schemars(description = "Resource path to the script")]
    pub script_path: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct FindByTypeRequest {
    #[serde(rename = "type")]
    #[schemars(description = "Class name, e.g. \"Area3D\", \"Label\"")]
    pub node_type: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct FindByGroupRequest {
    #[schemars(description = "Group name, e.g. \"enemies\"")]
    pub group: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SignalConnectionsRequest {
    #[schemars(description = "Path to the source node")]
    pub source: String,
    #[serde(default)]
    #[schemars(description = "Optional signal name to filter")]
    pub signal: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SearchFilesRequest {
    #[schemars(description = "Search query, matched against filenames")]
    pub query: String,
    #[serde(default)]
    #[schemars(description = "Optional extension filter, e.g. \".gd\"")]
    pub extension: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct UidRequest {
    #[schemars(description = "A uid:// or res:// value; direction is auto-detected")]
    pub value: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct DuplicateSceneRequest {
    #[schemars(description = "Existing .tscn scene path")]
    pub source_path: String,
    #[schemars(description = "New .tscn scene path")]
    pub dest_path: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct RenameSceneRequest {
    pub old_path: String,
    pub new_path: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ReplaceResourceRequest {
    #[schemars(description = ".tscn path to rewrite")]
    pub scene_path: String,
    #[schemars(description = "Existing resource path to replace")]
    pub old_resource: String,
    #[schemars(description = "New resource path")]
    pub new_resource: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct AddResourceRequest {
    #[schemars(description = "Path to the node")]
    pub node_path: String,
    #[schemars(description = "Property name, e.g. \"shape\", \"mesh\"")]
    pub property: String,
    #[schemars(description = "Resource class, e.g. \"BoxShape3D\"")]
    pub resource_type: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct FpsControllerRequest {
    #[serde(default = "defaults::parent")]
    pub parent_path: String,
    #[serde(default = "defaults::player")]
    pub name: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct HealthBarRequest {
    #[serde(default = "defaults::parent")]
    pub parent_path: String,
    #[serde(default = "defaults::health_bar")]
    pub name: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SpinningPickupRequest {
    #[serde(default = "defaults::parent")]
    pub parent_path: String,
    #[serde(default = "defaults::coin_scene")]
    pub scene_path: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct AnchorPresetRequest {
    #[schemars(description = "Path to the Control node")]
    pub path: String,
    #[schemars(
        description = "One of: top_left, top_right, bottom_left, bottom_right, center_left, center_right, center_top, center_bottom, center, left_wide, right_wide, top_wide, bottom_wide, vcenter_wide, hcenter_wide, full_rect"
    )]
    pub preset: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct AnchorValuesRequest {
    #[schemars(description = "Path to the Control node")]
    pub path: String,
    #[serde(default)]
    pub left: f64,
    #[serde(default)]
    pub top: f64,
    #[serde(default = "defaults::one")]
    pub right: f64,
    #[serde(default = "defaults::one")]
    pub bottom: f64,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct EditFileRequest {
    #[schemars(description = "Path to the file, e.g. \"res://player.gd\"")]
    pub path: String,
    #[schemars(description = "Text to find")]
    pub find: String,
    #[schemars(description = "Replacement text")]
    pub replace: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct TerrainMeshRequest {
    #[serde(default = "defaults::terrain_size")]
    #[schemars(description = "Width/depth of the terrain in units")]
    pub size: i64,
    #[serde(default = "defaults::five")]
    #[schemars(description = "Maximum height of the terrain")]
    pub height_scale: f64,
    #[serde(default)]
    #[schemars(description = "Noise seed (0 = random)")]
    pub seed: i64,
    #[serde(default = "defaults::parent")]
    pub parent_path: String,
    #[serde(default = "defaults::terrain")]
    pub name: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct TerrainMaterialRequest {
    #[serde(default = "defaults::terrain_shader")]
    #[schemars(description = "Output path for the .gdshader file")]
    pub path: String,
    #[serde(rename = "type", default = "defaults::full")]
    #[schemars(description = "\"height_blend\", \"slope_blend\", \"triplanar\", or \"full\"")]
    pub material_type: String,
    #[serde(default = "defaults::tenth")]
    #[schemars(description = "UV scale for textures (smaller = more tiled)")]
    pub texture_scale: f64,
    #[serde(default = "defaults::two")]
    #[schemars(description = "Sharpness of transitions between textures")]
    pub blend_sharpness: f64,
    #[serde(default = "defaults::height_levels")]
    #[schemars(description = "Comma-separated height thresholds (grass,dirt,rock,snow)")]
    pub height_levels: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ParticleEffectRequest {
    #[serde(default = "defaults::fire")]
    #[schemars(
        description = "\"fire\", \"smoke\", \"sparks\", \"explosion\", \"magic\", \"rain\", \"snow\", \"dust\", \"leaves\", or \"blood\""
    )]
    pub preset: String,
    #[serde(default = "defaults::parent")]
    pub parent_path: String,
    #[serde(default = "defaults::particles")]
    pub name: String,
    #[serde(default = "defaults::yes")]
    #[schemars(description = "GPUParticles3D when true, GPUParticles2D when false")]
    pub is_3d: bool,
    #[serde(default)]
    #[schemars(description = "Play once then stop (auto-set for explosion/blood)")]
    pub one_shot: bool,
    #[serde(default = "defaults::yes")]
    #[schemars(description = "Start emitting immediately")]
    pub emitting: bool,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct LightingPresetRequest {
    #[serde(default = "defaults::sunny")]
    #[schemars(description = "\"sunny\", \"overcast\", \"sunset\", \"night\", or \"indoor\"")]
    pub preset: String,
    #[serde(default = "defaults::parent")]
    pub parent_path: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct CreatePrimitiveRequest {
    #[serde(default = "defaults::boxed")]
    #[schemars(
        description = "\"box\", \"sphere\", \"cylinder\", \"capsule\", \"plane\", \"prism\", or \"torus\""
    )]
    pub shape: String,
    #[serde(default = "defaults::parent")]
    pub parent_path: String,
    #[serde(default = "defaults::primitive")]
    pub name: String,
    #[serde(default = "defaults::one")]
    #[schemars(description = "Size in units")]
    pub size: f64,
    #[serde(default = "defaults::light_gray")]
    #[schemars(description = "RGB color as \"r,g,b\" in the 0-1 range")]
    pub color: String,
    #[serde(default = "defaults::yes")]
    #[schemars(description = "Wrap in a StaticBody3D with a collision shape")]
    pub collision: bool,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct UiTemplateRequest {
    #[serde(default = "defaults::main_menu")]
    #[schemars(
        description = "\"main_menu\", \"pause_menu\", \"hud\", \"dialogue_box\", or \"inventory_grid\""
    )]
    pub template: String,
    #[serde(default = "defaults::parent")]
    pub parent_path: String,
    #[serde(default)]
    #[schemars(description = "Optional custom name (defaults to the template name)")]
    pub name: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct TriggerAreaRequest {
    #[serde(default = "defaults::parent")]
    pub parent_path: String,
    #[serde(default = "defaults::trigger_area")]
    pub name: String,
    #[serde(default = "defaults::boxed")]
    #[schemars(description = "\"box\", \"sphere\", \"capsule\", or \"cylinder\"")]
    pub shape: String,
    #[serde(default = "defaults::two")]
    pub size: f64,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct CreateRigidBodyRequest {
    #[serde(default = "defaults::parent")]
    pub parent_path: String,
    #[serde(default = "defaults::rigid_body")]
    pub name: String,
    #[serde(default = "defaults::boxed")]
    #[schemars(description = "\"box\", \"sphere\", \"capsule\", or \"cylinder\"")]
    pub shape: String,
    #[serde(default = "defaults::one")]
    pub size: f64,
    #[serde(default = "defaults::one")]
    #[schemars(description = "Mass in kg")]
    pub mass: f64,
    #[serde(default = "defaults::gray")]
    #[schemars(description = "RGB color as \"r,g,b\" in the 0-1 range")]
    pub color: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SaveGameDataRequest {
    #[serde(default = "defaults::save_file")]
    #[schemars(description = "Save file name (.json is added if missing)")]
    pub filename: String,
    #[serde(default = "defaults::empty_json")]
    #[schemars(description = "JSON string of data to save, e.g. '{\"level\": 5}'")]
    pub data: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct LoadGameDataRequest {
    #[serde(default = "defaults::save_file")]
    #[schemars(description = "Save file name to load")]
    pub filename: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct DocsRequest {
    #[schemars(description = "Godot class name, e.g. \"MeshInstance3D\"")]
    pub class_name: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct DocsSearchRequest {
    #[schemars(description = "Search query, e.g. \"collision layers\"")]
    pub query: String,
}

/// Tool surface bound to one bridge and one docs client.
pub struct GodotMcp {
    bridge: Bridge,
    docs: DocsClient,
    tool_router: ToolRouter<Self>,
}

#[tool_router]
impl GodotMcp {
    pub fn new(config: BridgeConfig) -> Self {
        Self {
            bridge: Bridge::new(config),
            docs: DocsClient::new(),
            tool_router: Self::tool_router(),
        }
    }

    /// One exchange with the editor; transport faults and remote `error`
    /// fields both land in `Err` as the message the agent should see.
    async fn call(&self, command: Command) -> Result<Reply, String> {
        let reply = self.bridge.call(&command).await.map_err(|e| e.to_string())?;
        if let Some(message) = reply.error() {
            debug!(method = %command.method, "editor reported an error");
            return Err(message.to_string());
        }
        Ok(reply)
    }

    /// Projection used by most tools: success renders the `result` field.
    async fn call_result(&self, command: Command) -> CallToolResult {
        self.call_text_field(command, "result").await
    }

    /// Success renders a named field as text (`null` when absent).
    async fn call_text_field(&self, command: Command, field: &str) -> CallToolResult {
        match self.call(command).await {
            Ok(reply) => text(display(reply.field(field))),
            Err(e) => text(format!("Error: {e}")),
        }
    }

    /// Success renders the whole reply as pretty JSON.
    async fn call_dump(&self, command: Command) -> CallToolResult {
        match self.call(command).await {
            Ok(reply) => text(pretty_reply(reply)),
            Err(e) => text(format!("Error: {e}")),
        }
    }

    /// Success renders a named field as pretty JSON (`null` when absent).
    async fn call_field(&self, command: Command, field: &str) -> CallToolResult {
        match self.call(command).await {
            Ok(reply) => text(pretty(reply.field(field).unwrap_or(&Value::Null))),
            Err(e) => text(format!("Error: {e}")),
        }
    }

    /// Like [`Self::call_field`] but a missing field reads as `[]`.
    async fn call_list(&self, command: Command, field: &str) -> CallToolResult {
        match self.call(command).await {
            Ok(reply) => {
                let empty = Value::Array(Vec::new());
                text(pretty(reply.field(field).unwrap_or(&empty)))
            }
            Err(e) => text(format!("Error: {e}")),
        }
    }

    /// Diagnostic projection: the reply (or the failure) as raw JSON.
    async fn call_raw(&self, command: Command) -> CallToolResult {
        match self.bridge.call(&command).await {
            Ok(reply) => text(pretty_reply(reply)),
            Err(e) => text(pretty(&serde_json::json!({ "error": e.to_string() }))),
        }
    }

    // --- Connection / scene inspection ---

    #[tool(description = "Check if the Godot editor is running and listening")]
    async fn godot_status(&self) -> Result<CallToolResult, McpError> {
        Ok(match self.bridge.ping().await {
            Ok(true) => text("Connected: Godot Editor is listening."),
            Ok(false) => text("Disconnected: unexpected reply from the editor"),
            Err(e) => text(format!("Disconnected: {e}")),
        })
    }

    #[tool(description = "Get the current scene tree structure (nodes and hierarchy) as JSON")]
    async fn godot_get_scene_tree(&self) -> Result<CallToolResult, McpError> {
        Ok(self.call_field(Command::new("get_scene_tree"), "tree").await)
    }

    #[tool(description = "Debug tool to check editor state (open scenes, etc.)")]
    async fn godot_get_state(&self) -> Result<CallToolResult, McpError> {
        Ok(self.call_raw(Command::new("get_state")).await)
    }

    #[tool(description = "Get detailed properties of a node")]
    async fn godot_get_node_details(
        &self,
        Parameters(p): Parameters<NodePathRequest>,
    ) -> Result<CallToolResult, McpError> {
        Ok(self
            .call_dump(Command::new("get_node_details").arg("path", p.path))
            .await)
    }

    #[tool(description = "Get the list of currently selected nodes in the editor")]
    async fn godot_get_selection(&self) -> Result<CallToolResult, McpError> {
        Ok(self.call_list(Command::new("get_selection"), "selection").await)
    }

    #[tool(description = "Get recent errors from the Godot editor")]
    async fn godot_get_errors(&self) -> Result<CallToolResult, McpError> {
        Ok(self.call_raw(Command::new("get_errors")).await)
    }

    // --- Node manipulation ---

    #[tool(description = "Add a new node to the current scene")]
    async fn godot_add_node(
        &self,
        Parameters(p): Parameters<AddNodeRequest>,
    ) -> Result<CallToolResult, McpError> {
        let command = Command::new("add_node")
            .arg("type", p.node_type)
            .arg("name", p.name)
            .arg("parent_path", p.parent_path);
        Ok(match self.call(command).await {
            Ok(reply) => text(format!(
                "Success: Node created at {}",
                display(reply.field("path"))
            )),
            Err(e) => text(format!("Error adding node: {e}")),
        })
    }

    #[tool(description = "Delete a node from the scene")]
    async fn godot_delete_node(
        &self,
        Parameters(p): Parameters<NodePathRequest>,
    ) -> Result<CallToolResult, McpError> {
        Ok(self
            .call_result(Command::new("delete_node").arg("path", p.path))
            .await)
    }

    #[tool(description = "Move a node to a new parent")]
    async fn godot_reparent_node(
        &self,
        Parameters(p): Parameters<ReparentNodeRequest>,
    ) -> Result<CallToolResult, McpError> {
        let command = Command::new("reparent_node")
            .arg("path", p.path)
            .arg("new_parent", p.new_parent_path);
        Ok(self.call_result(command).await)
    }

    #[tool(description = "Rename a node")]
    async fn godot_rename_node(
        &self,
        Parameters(p): Parameters<RenameNodeRequest>,
    ) -> Result<CallToolResult, McpError> {
        let command = Command::new("rename_node")
            .arg("path", p.path)
            .arg("new_name", p.new_name);
        Ok(self.call_result(command).await)
    }

    #[tool(description = "Duplicate a node and all its children")]
    async fn godot_duplicate_node(
        &self,
        Parameters(p): Parameters<DuplicateNodeRequest>,
    ) -> Result<CallToolResult, McpError> {
        let command = Command::new("duplicate_node")
            .arg("path", p.path)
            .arg("new_name", p.new_name);
        Ok(match self.call(command).await {
            Ok(reply) => text(format!("Duplicated: {}", display(reply.field("path")))),
            Err(e) => text(format!("Error: {e}")),
        })
    }

    #[tool(description = "Set a property on a node")]
    async fn godot_set_property(
        &self,
        Parameters(p): Parameters<SetPropertyRequest>,
    ) -> Result<CallToolResult, McpError> {
        let property = p.property.clone();
        let command = Command::new("set_property")
            .arg("path", p.path)
            .arg("property", p.property)
            .arg("value", p.value);
        Ok(match self.call(command).await {
            Ok(reply) => text(format!(
                "Success: Set {property} to {}",
                display(reply.field("new_value"))
            )),
            Err(e) => text(format!("Error: {e}")),
        })
    }

    #[tool(description = "Focus the editor camera/selection on a specific node")]
    async fn godot_focus_node(
        &self,
        Parameters(p): Parameters<NodePathRequest>,
    ) -> Result<CallToolResult, McpError> {
        Ok(self
            .call_result(Command::new("focus_node").arg("path", p.path))
            .await)
    }

    // --- Scripts ---

    #[tool(description = "Execute a GDScript snippet in the context of the EditorInterface")]
    async fn godot_execute_code(
        &self,
        Parameters(p): Parameters<ExecuteCodeRequest>,
    ) -> Result<CallToolResult, McpError> {
        let command = Command::new("execute_script").arg("code", p.code);
        Ok(match self.bridge.call(&command).await {
            Ok(reply) => match reply.error() {
                Some(message) => {
                    let source = reply.field_str("source").unwrap_or("");
                    text(format!("Script Error: {message}\nSource:\n{source}"))
                }
                None => text(format!("Result: {}", display(reply.result()))),
            },
            Err(e) => text(format!("Script Error: {e}\nSource:\n")),
        })
    }

    #[tool(description = "Create or overwrite a GDScript file")]
    async fn godot_create_script(
        &self,
        Parameters(p): Parameters<CreateScriptRequest>,
    ) -> Result<CallToolResult, McpError> {
        let command = Command::new("save_script")
            .arg("path", p.path)
            .arg("content", p.content);
        Ok(self.call_result(command).await)
    }

    #[tool(description = "Read the content of a GDScript file")]
    async fn godot_read_script(
        &self,
        Parameters(p): Parameters<ResourcePathRequest>,
    ) -> Result<CallToolResult, McpError> {
        Ok(self
            .call_text_field(Command::new("read_script").arg("path", p.path), "content")
            .await)
    }

    #[tool(description = "Attach an existing script to a node")]
    async fn godot_attach_script(
        &self,
        Parameters(p): Parameters<AttachScriptRequest>,
    ) -> Result<CallToolResult, McpError> {
        let command = Command::new("attach_script")
            .arg("node_path", p.node_path)
            .arg("script_path", p.script_path);
        Ok(self.call_result(command).await)
    }

    #[tool(description = "Get a list of all scripts open in the script editor")]
    async fn godot_get_open_scripts(&self) -> Result<CallToolResult, McpError> {
        Ok(self
            .call_list(Command::new("get_open_scripts"), "scripts")
            .await)
    }

    #[tool(description = "Edit a file by finding and replacing text")]
    async fn godot_edit_file(
        &self,
        Parameters(p): Parameters<EditFileRequest>,
    ) -> Result<CallToolResult, McpError> {
        let command = Command::new("edit_file")
            .arg("path", p.path)
            .arg("find", p.find)
            .arg("replace", p.replace);
        Ok(self.call_result(command).await)
    }

    // --- Scenes ---

    #[tool(description = "Create a new empty scene and open it")]
    async fn godot_new_scene(
        &self,
        Parameters(p): Parameters<NewSceneRequest>,
    ) -> Result<CallToolResult, McpError> {
        let command = Command::new("new_scene")
            .arg("root_type", p.root_type)
            .arg("name", p.name);
        Ok(self.call_result(command).await)
    }

    #[tool(description = "Open an existing scene file")]
    async fn godot_open_scene(
        &self,
        Parameters(p): Parameters<ResourcePathRequest>,
    ) -> Result<CallToolResult, McpError> {
        Ok(self
            .call_result(Command::new("open_scene").arg("path", p.path))
            .await)
    }

    #[tool(description = "Save the current scene")]
    async fn godot_save_scene(
        &self,
        Parameters(p): Parameters<SaveSceneRequest>,
    ) -> Result<CallToolResult, McpError> {
        Ok(self
            .call_result(Command::new("save_scene").arg("path", p.path))
            .await)
    }

    #[tool(description = "Instantiate a .tscn file into the current scene")]
    async fn godot_instantiate_scene(
        &self,
        Parameters(p): Parameters<InstantiateSceneRequest>,
    ) -> Result<CallToolResult, McpError> {
        let command = Command::new("instantiate_scene")
            .arg("path", p.path)
            .arg("parent_path", p.parent_path);
        Ok(self.call_result(command).await)
    }

    #[tool(description = "Get the raw text content of the current scene file (.tscn)")]
    async fn godot_get_scene_file_content(&self) -> Result<CallToolResult, McpError> {
        Ok(self
            .call_text_field(Command::new("get_scene_file_content"), "content")
            .await)
    }

    #[tool(description = "Delete a scene file from the project")]
    async fn godot_delete_scene(
        &self,
        Parameters(p): Parameters<ResourcePathRequest>,
    ) -> Result<CallToolResult, McpError> {
        Ok(self
            .call_result(Command::new("delete_scene").arg("path", p.path))
            .await)
    }

    #[tool(description = "Duplicate a scene file")]
    async fn godot_duplicate_scene(
        &self,
        Parameters(p): Parameters<DuplicateSceneRequest>,
    ) -> Result<CallToolResult, McpError> {
        let command = Command::new("duplicate_scene")
            .arg("source_path", p.source_path)
            .arg("dest_path", p.dest_path);
        Ok(self.call_dump(command).await)
    }

    #[tool(description = "Rename a scene file")]
    async fn godot_rename_scene(
        &self,
        Parameters(p): Parameters<RenameSceneRequest>,
    ) -> Result<CallToolResult, McpError> {
        let command = Command::new("rename_scene")
            .arg("old_path", p.old_path)
            .arg("new_path", p.new_path);
        Ok(self.call_dump(command).await)
    }

    #[tool(description = "Replace all uses of a resource path inside a scene file")]
    async fn godot_replace_resource_in_scene(
        &self,
        Parameters(p): Parameters<ReplaceResourceRequest>,
    ) -> Result<CallToolResult, McpError> {
        let command = Command::new("replace_resource_in_scene")
            .arg("scene_path", p.scene_path)
            .arg("old_resource", p.old_resource)
            .arg("new_resource", p.new_resource);
        Ok(self.call_dump(command).await)
    }

    // --- Filesystem / project ---

    #[tool(description = "List files in the Godot filesystem")]
    async fn godot_list_resources(
        &self,
        Parameters(p): Parameters<ListResourcesRequest>,
    ) -> Result<CallToolResult, McpError> {
        Ok(self
            .call_field(Command::new("list_dir").arg("path", p.path), "files")
            .await)
    }

    #[tool(description = "Create a folder in the filesystem")]
    async fn godot_create_folder(
        &self,
        Parameters(p): Parameters<ResourcePathRequest>,
    ) -> Result<CallToolResult, McpError> {
        Ok(self
            .call_result(Command::new("create_folder").arg("path", p.path))
            .await)
    }

    #[tool(description = "Search for project files by fuzzy filename match")]
    async fn godot_search_files(
        &self,
        Parameters(p): Parameters<SearchFilesRequest>,
    ) -> Result<CallToolResult, McpError> {
        let command = Command::new("search_files")
            .arg("query", p.query)
            .arg("extension", p.extension);
        Ok(self.call_field(command, "files").await)
    }

    #[tool(description = "Convert between a uid:// value and a res:// path (auto-detected)")]
    async fn godot_uid(
        &self,
        Parameters(p): Parameters<UidRequest>,
    ) -> Result<CallToolResult, McpError> {
        // Direction is decided locally from the prefix; anything else is
        // rejected without touching the editor.
        if p.value.starts_with("uid://") {
            Ok(self
                .call_text_field(Command::new("uid_to_path").arg("uid", p.value), "path")
                .await)
        } else if p.value.starts_with("res://") {
            Ok(self
                .call_text_field(Command::new("path_to_uid").arg("path", p.value), "uid")
                .await)
        } else {
            Ok(text("Error: Value must start with 'uid://' or 'res://'"))
        }
    }

    #[tool(description = "Set a project setting")]
    async fn godot_set_project_setting(
        &self,
        Parameters(p): Parameters<ProjectSettingRequest>,
    ) -> Result<CallToolResult, McpError> {
        let command = Command::new("set_project_setting")
            .arg("name", p.name)
            .arg("value", p.value);
        Ok(self.call_result(command).await)
    }

    #[tool(description = "Get project information: name, version, main scene, renderer, etc.")]
    async fn godot_get_project_info(&self) -> Result<CallToolResult, McpError> {
        Ok(self.call_dump(Command::new("get_project_info")).await)
    }

    #[tool(description = "Add an action to the Input Map")]
    async fn godot_setup_input_map(
        &self,
        Parameters(p): Parameters<InputMapRequest>,
    ) -> Result<CallToolResult, McpError> {
        let command = Command::new("setup_input_map")
            .arg("action", p.action)
            .arg("event_type", p.event_type)
            .arg("key", p.key)
            .arg("joy_button", p.joy_button);
        Ok(self.call_result(command).await)
    }

    #[tool(description = "Clear/reset the Godot output panel")]
    async fn godot_clear_output(&self) -> Result<CallToolResult, McpError> {
        Ok(self.call_result(Command::new("clear_output")).await)
    }

    // --- Game control ---

    #[tool(description = "Control game execution: play (F5) or stop (F8)")]
    async fn godot_game(
        &self,
        Parameters(p): Parameters<GameRequest>,
    ) -> Result<CallToolResult, McpError> {
        let action = match GameAction::parse(&p.action) {
            Ok(action) => action,
            Err(message) => return Ok(text(message)),
        };
        Ok(self.call_result(Command::new(action.method())).await)
    }

    #[tool(description = "Capture a screenshot of the Godot editor window")]
    async fn godot_get_editor_screenshot(&self) -> Result<CallToolResult, McpError> {
        Ok(match self.call(Command::new("get_editor_screenshot")).await {
            Ok(reply) => {
                let length = reply.field_str("image_base64").map(str::len).unwrap_or(0);
                text(format!("Screenshot captured (base64 PNG, {length} chars)"))
            }
            Err(e) => text(format!("Error: {e}")),
        })
    }

    #[tool(description = "Capture a screenshot of the running game window")]
    async fn godot_get_game_screenshot(&self) -> Result<CallToolResult, McpError> {
        Ok(match self.call(Command::new("get_game_screenshot")).await {
            Ok(_) => text("Screenshot captured (base64 PNG)"),
            Err(e) => text(format!("Error: {e}")),
        })
    }

    // --- Signals ---

    #[tool(description = "Connect or disconnect a signal")]
    async fn godot_signal(
        &self,
        Parameters(p): Parameters<SignalRequest>,
    ) -> Result<CallToolResult, McpError> {
        let action = match SignalAction::parse(&p.action) {
            Ok(action) => action,
            Err(message) => return Ok(text(message)),
        };
        let command = Command::new(action.method())
            .arg("source", p.source)
            .arg("signal", p.signal)
            .arg("target", p.target)
            .arg("method", p.method);
        Ok(self.call_result(command).await)
    }

    #[tool(description = "List all signals available on a node")]
    async fn godot_list_signals(
        &self,
        Parameters(p): Parameters<NodePathRequest>,
    ) -> Result<CallToolResult, McpError> {
        Ok(self
            .call_list(Command::new("list_signals").arg("path", p.path), "signals")
            .await)
    }

    #[tool(description = "List all methods available on a node")]
    async fn godot_list_methods(
        &self,
        Parameters(p): Parameters<NodePathRequest>,
    ) -> Result<CallToolResult, McpError> {
        Ok(self
            .call_list(Command::new("list_methods").arg("path", p.path), "methods")
            .await)
    }

    #[tool(description = "List connections for a node and optional signal")]
    async fn godot_list_signal_connections(
        &self,
        Parameters(p): Parameters<SignalConnectionsRequest>,
    ) -> Result<CallToolResult, McpError> {
        let mut command = Command::new("list_signal_connections").arg("source", p.source);
        if !p.signal.is_empty() {
            command = command.arg("signal", p.signal);
        }
        Ok(self.call_list(command, "connections").await)
    }

    // --- Search ---

    #[tool(description = "Find all nodes of a specific type in the scene")]
    async fn godot_find_nodes_by_type(
        &self,
        Parameters(p): Parameters<FindByTypeRequest>,
    ) -> Result<CallToolResult, McpError> {
        Ok(self
            .call_list(
                Command::new("find_nodes_by_type").arg("type", p.node_type),
                "nodes",
            )
            .await)
    }

    #[tool(description = "Find all nodes in a specific group")]
    async fn godot_find_nodes_by_group(
        &self,
        Parameters(p): Parameters<FindByGroupRequest>,
    ) -> Result<CallToolResult, McpError> {
        Ok(self
            .call_list(
                Command::new("find_nodes_by_group").arg("group", p.group),
                "nodes",
            )
            .await)
    }

    // --- Groups ---

    #[tool(description = "Manage node groups: add, remove, or list membership")]
    async fn godot_group(
        &self,
        Parameters(p): Parameters<GroupRequest>,
    ) -> Result<CallToolResult, McpError> {
        let action = match GroupAction::parse(&p.action) {
            Ok(action) => action,
            Err(message) => return Ok(text(message)),
        };
        match action {
            GroupAction::Get => Ok(self
                .call_list(Command::new(action.method()).arg("path", p.path), "groups")
                .await),
            GroupAction::Add | GroupAction::Remove => {
                if p.group.is_empty() {
                    let verb = if action == GroupAction::Add { "add" } else { "remove" };
                    return Ok(text(format!(
                        "Error: 'group' parameter required for {verb} action"
                    )));
                }
                let command = Command::new(action.method())
                    .arg("path", p.path)
                    .arg("group", p.group);
                Ok(self.call_result(command).await)
            }
        }
    }

    // --- Animation ---

    #[tool(description = "List all animations on an AnimationPlayer node")]
    async fn godot_list_animations(
        &self,
        Parameters(p): Parameters<ListAnimationsRequest>,
    ) -> Result<CallToolResult, McpError> {
        Ok(self
            .call_list(
                Command::new("list_animations").arg("path", p.player_path),
                "animations",
            )
            .await)
    }

    #[tool(description = "Control AnimationPlayer playback: play, stop, or seek")]
    async fn godot_animation(
        &self,
        Parameters(p): Parameters<AnimationRequest>,
    ) -> Result<CallToolResult, McpError> {
        let action = match AnimationAction::parse(&p.action) {
            Ok(action) => action,
            Err(message) => return Ok(text(message)),
        };
        let command = match action {
            AnimationAction::Play => {
                if p.animation.is_empty() {
                    return Ok(text("Error: 'animation' parameter required for play action"));
                }
                Command::new(action.method())
                    .arg("path", p.player_path)
                    .arg("animation", p.animation)
                    .arg("start_time", p.start_time)
            }
            AnimationAction::Stop => Command::new(action.method()).arg("path", p.player_path),
            AnimationAction::Seek => Command::new(action.method())
                .arg("path", p.player_path)
                .arg("time", p.start_time)
                .arg("update", true)
                .arg("backwards", p.backwards),
        };
        Ok(self.call_result(command).await)
    }

    #[tool(description = "Create a simple two-keyframe value animation on a property")]
    async fn godot_create_simple_animation(
        &self,
        Parameters(p): Parameters<SimpleAnimationRequest>,
    ) -> Result<CallToolResult, McpError> {
        let command = Command::new("create_simple_animation")
            .arg("player_path", p.player_path)
            .arg("animation_name", p.animation_name)
            .arg("node_path", p.node_path)
            .arg("property", p.property)
            .arg("start_value", p.start_value)
            .arg("end_value", p.end_value)
            .arg("duration", p.duration);
        Ok(self.call_dump(command).await)
    }

    // --- Audio ---

    #[tool(description = "Create an AudioStreamPlayer or AudioStreamPlayer3D")]
    async fn godot_create_audio_player(
        &self,
        Parameters(p): Parameters<CreateAudioPlayerRequest>,
    ) -> Result<CallToolResult, McpError> {
        let command = Command::new("create_audio_player")
            .arg("parent_path", p.parent_path)
            .arg("name", p.name)
            .arg("is_3d", p.is_3d)
            .arg("audio_path", p.audio_path)
            .arg("autoplay", p.autoplay)
            .arg("play_now", p.play_now);
        Ok(self.call_dump(command).await)
    }

    #[tool(description = "Control audio playback on an AudioStreamPlayer node")]
    async fn godot_audio(
        &self,
        Parameters(p): Parameters<AudioRequest>,
    ) -> Result<CallToolResult, McpError> {
        let action = match AudioAction::parse(&p.action) {
            Ok(action) => action,
            Err(message) => return Ok(text(message)),
        };
        Ok(self
            .call_result(Command::new(action.method()).arg("path", p.path))
            .await)
    }

    #[tool(description = "Set an audio bus volume in decibels")]
    async fn godot_set_bus_volume(
        &self,
        Parameters(p): Parameters<BusVolumeRequest>,
    ) -> Result<CallToolResult, McpError> {
        let command = Command::new("set_bus_volume")
            .arg("bus", p.bus)
            .arg("volume_db", p.volume_db);
        Ok(self.call_dump(command).await)
    }

    // --- Shaders / resources ---

    #[tool(description = "Create a .gdshader file")]
    async fn godot_create_shader(
        &self,
        Parameters(p): Parameters<CreateShaderRequest>,
    ) -> Result<CallToolResult, McpError> {
        let command = Command::new("create_shader")
            .arg("path", p.path)
            .arg("code", p.code);
        Ok(self.call_result(command).await)
    }

    #[tool(description = "Apply a shader to a node's material")]
    async fn godot_apply_shader(
        &self,
        Parameters(p): Parameters<ApplyShaderRequest>,
    ) -> Result<CallToolResult, McpError> {
        let command = Command::new("apply_shader")
            .arg("node_path", p.node_path)
            .arg("shader_path", p.shader_path);
        Ok(self.call_result(command).await)
    }

    #[tool(description = "Add a new resource to a node's property")]
    async fn godot_add_resource(
        &self,
        Parameters(p): Parameters<AddResourceRequest>,
    ) -> Result<CallToolResult, McpError> {
        let command = Command::new("add_resource")
            .arg("node_path", p.node_path)
            .arg("property", p.property)
            .arg("resource_type", p.resource_type);
        Ok(self.call_result(command).await)
    }

    // --- UI ---

    #[tool(description = "Set a Control node's anchors using a preset")]
    async fn godot_set_anchor_preset(
        &self,
        Parameters(p): Parameters<AnchorPresetRequest>,
    ) -> Result<CallToolResult, McpError> {
        let command = Command::new("set_anchor_preset")
            .arg("path", p.path)
            .arg("preset", p.preset);
        Ok(self.call_result(command).await)
    }

    #[tool(description = "Set precise anchor values for a Control node")]
    async fn godot_set_anchor_values(
        &self,
        Parameters(p): Parameters<AnchorValuesRequest>,
    ) -> Result<CallToolResult, McpError> {
        let command = Command::new("set_anchor_values")
            .arg("path", p.path)
            .arg("left", p.left)
            .arg("top", p.top)
            .arg("right", p.right)
            .arg("bottom", p.bottom);
        Ok(self.call_result(command).await)
    }

    #[tool(description = "Create a complete UI layout from a template")]
    async fn godot_create_ui_template(
        &self,
        Parameters(p): Parameters<UiTemplateRequest>,
    ) -> Result<CallToolResult, McpError> {
        let command = Command::new("create_ui_template")
            .arg("template", p.template)
            .arg("parent_path", p.parent_path)
            .arg("name", p.name);
        Ok(self.call_dump(command).await)
    }

    // --- Scene scaffolding ---

    #[tool(description = "Spawn a CharacterBody3D-based FPS controller with a Camera3D")]
    async fn godot_spawn_fps_controller(
        &self,
        Parameters(p): Parameters<FpsControllerRequest>,
    ) -> Result<CallToolResult, McpError> {
        let command = Command::new("spawn_fps_controller")
            .arg("parent_path", p.parent_path)
            .arg("name", p.name);
        Ok(self.call_dump(command).await)
    }

    #[tool(description = "Create a simple health bar UI anchored top-left")]
    async fn godot_create_health_bar_ui(
        &self,
        Parameters(p): Parameters<HealthBarRequest>,
    ) -> Result<CallToolResult, McpError> {
        let command = Command::new("create_health_bar_ui")
            .arg("parent_path", p.parent_path)
            .arg("name", p.name);
        Ok(self.call_dump(command).await)
    }

    #[tool(description = "Spawn a spinning pickup instance from a scene file")]
    async fn godot_spawn_spinning_pickup(
        &self,
        Parameters(p): Parameters<SpinningPickupRequest>,
    ) -> Result<CallToolResult, McpError> {
        let command = Command::new("spawn_spinning_pickup")
            .arg("parent_path", p.parent_path)
            .arg("scene_path", p.scene_path);
        Ok(self.call_dump(command).await)
    }

    #[tool(description = "Generate a 3D terrain mesh with collision using noise")]
    async fn godot_generate_terrain_mesh(
        &self,
        Parameters(p): Parameters<TerrainMeshRequest>,
    ) -> Result<CallToolResult, McpError> {
        let command = Command::new("generate_terrain_mesh")
            .arg("size", p.size)
            .arg("height_scale", p.height_scale)
            .arg("seed", p.seed)
            .arg("parent_path", p.parent_path)
            .arg("name", p.name);
        Ok(self.call_dump(command).await)
    }

    #[tool(description = "Create a terrain shader material (height/slope/triplanar blends)")]
    async fn godot_create_terrain_material(
        &self,
        Parameters(p): Parameters<TerrainMaterialRequest>,
    ) -> Result<CallToolResult, McpError> {
        let command = Command::new("create_terrain_material")
            .arg("path", p.path)
            .arg("type", p.material_type)
            .arg("texture_scale", p.texture_scale)
            .arg("blend_sharpness", p.blend_sharpness)
            .arg("height_levels", p.height_levels);
        Ok(self.call_dump(command).await)
    }

    #[tool(description = "Create a particle effect from a preset")]
    async fn godot_create_particle_effect(
        &self,
        Parameters(p): Parameters<ParticleEffectRequest>,
    ) -> Result<CallToolResult, McpError> {
        let command = Command::new("create_particle_effect")
            .arg("preset", p.preset)
            .arg("parent_path", p.parent_path)
            .arg("name", p.name)
            .arg("is_3d", p.is_3d)
            .arg("one_shot", p.one_shot)
            .arg("emitting", p.emitting);
        Ok(self.call_dump(command).await)
    }

    #[tool(description = "Create a lighting setup with DirectionalLight3D and WorldEnvironment")]
    async fn godot_lighting_preset(
        &self,
        Parameters(p): Parameters<LightingPresetRequest>,
    ) -> Result<CallToolResult, McpError> {
        let command = Command::new("lighting_preset")
            .arg("preset", p.preset)
            .arg("parent_path", p.parent_path);
        Ok(self.call_dump(command).await)
    }

    #[tool(description = "Create a 3D primitive mesh, with collision by default")]
    async fn godot_create_primitive(
        &self,
        Parameters(p): Parameters<CreatePrimitiveRequest>,
    ) -> Result<CallToolResult, McpError> {
        let command = Command::new("create_primitive")
            .arg("shape", p.shape)
            .arg("parent_path", p.parent_path)
            .arg("name", p.name)
            .arg("size", p.size)
            .arg("color", p.color)
            .arg("collision", p.collision);
        Ok(self.call_dump(command).await)
    }

    #[tool(description = "Create an Area3D trigger with a configured collision shape")]
    async fn godot_create_trigger_area(
        &self,
        Parameters(p): Parameters<TriggerAreaRequest>,
    ) -> Result<CallToolResult, McpError> {
        let command = Command::new("create_trigger_area")
            .arg("parent_path", p.parent_path)
            .arg("name", p.name)
            .arg("shape", p.shape)
            .arg("size", p.size);
        Ok(self.call_dump(command).await)
    }

    #[tool(description = "Create a RigidBody3D with collision shape and visual mesh")]
    async fn godot_create_rigidbody(
        &self,
        Parameters(p): Parameters<CreateRigidBodyRequest>,
    ) -> Result<CallToolResult, McpError> {
        let command = Command::new("create_rigidbody")
            .arg("parent_path", p.parent_path)
            .arg("name", p.name)
            .arg("shape", p.shape)
            .arg("size", p.size)
            .arg("mass", p.mass)
            .arg("color", p.color);
        Ok(self.call_dump(command).await)
    }

    // --- Save data ---

    #[tool(description = "Save game data to the user:// directory as JSON")]
    async fn godot_save_game_data(
        &self,
        Parameters(p): Parameters<SaveGameDataRequest>,
    ) -> Result<CallToolResult, McpError> {
        // Validate before opening a connection; the editor never sees a
        // malformed payload.
        let parsed: Value = match serde_json::from_str(&p.data) {
            Ok(parsed) => parsed,
            Err(e) => return Ok(text(format!("Error: Invalid JSON data - {e}"))),
        };
        let command = Command::new("save_game_data")
            .arg("filename", p.filename)
            .arg("data", parsed);
        Ok(self.call_dump(command).await)
    }

    #[tool(description = "Load game data from the user:// directory")]
    async fn godot_load_game_data(
        &self,
        Parameters(p): Parameters<LoadGameDataRequest>,
    ) -> Result<CallToolResult, McpError> {
        Ok(self
            .call_dump(Command::new("load_game_data").arg("filename", p.filename))
            .await)
    }

    // --- Documentation ---

    #[tool(description = "Look up official Godot documentation for a class")]
    async fn godot_docs(
        &self,
        Parameters(p): Parameters<DocsRequest>,
    ) -> Result<CallToolResult, McpError> {
        Ok(text(self.docs.lookup_class(&p.class_name).await))
    }

    #[tool(description = "Search the Godot documentation for a topic")]
    async fn godot_docs_search(
        &self,
        Parameters(p): Parameters<DocsSearchRequest>,
    ) -> Result<CallToolResult, McpError> {
        Ok(text(self.docs.search(&p.query).await))
    }
}

#[tool_handler]
impl ServerHandler for GodotMcp {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "Drive a running Godot editor: inspect and edit scenes, scripts, \
                 and project settings through the MCP bridge plugin."
                    .to_string(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}

/// Serves the tool surface over stdio until the client disconnects.
///
/// Stdout carries the protocol; anything human-readable must go to stderr.
pub async fn serve_stdio(config: BridgeConfig) -> Result<(), McpError> {
    let service = GodotMcp::new(config);
    let running = service
        .serve(stdio())
        .await
        .map_err(|e| McpError::internal_error(e.to_string(), None))?;
    running
        .waiting()
        .await
        .map_err(|e| McpError::internal_error(e.to_string(), None))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::SocketAddr;
    use std::time::Duration;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    fn text_of(result: &CallToolResult) -> String {
        result
            .content
            .first()
            .and_then(|c| c.as_text())
            .map(|t| t.text.clone())
            .unwrap_or_default()
    }

    fn mcp_at(addr: SocketAddr) -> GodotMcp {
        GodotMcp::new(BridgeConfig {
            host: addr.ip().to_string(),
            port: addr.port(),
            timeout: Duration::from_secs(2),
        })
    }

    /// A bridge pointed at a port nothing listens on. Tools that validate
    /// locally must answer without ever hitting it.
    async fn mcp_at_closed_port() -> GodotMcp {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        mcp_at(addr)
    }

    /// Accepts one connection, reads the request line, replies with `reply`.
    async fn mcp_with_stub(reply: &'static str) -> GodotMcp {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut byte = [0u8; 1];
            while let Ok(1) = stream.read(&mut byte).await {
                request.push(byte[0]);
                if byte[0] == b'\n' {
                    break;
                }
            }
            stream.write_all(reply.as_bytes()).await.unwrap();
        });
        mcp_at(addr)
    }

    #[tokio::test]
    async fn status_reports_connected_on_pong() {
        let mcp = mcp_with_stub("{\"result\":\"pong\"}\n").await;
        let result = mcp.godot_status().await.unwrap();
        assert_eq!(text_of(&result), "Connected: Godot Editor is listening.");
    }

    #[tokio::test]
    async fn status_reports_disconnected_when_editor_is_down() {
        let mcp = mcp_at_closed_port().await;
        let result = mcp.godot_status().await.unwrap();
        let message = text_of(&result);
        assert!(message.starts_with("Disconnected:"));
        assert!(message.contains("Godot editor"));
    }

    #[tokio::test]
    async fn add_node_renders_the_created_path() {
        let mcp = mcp_with_stub("{\"result\":\"ok\",\"path\":\"Root/Sprite2D\"}\n").await;
        let result = mcp
            .godot_add_node(Parameters(AddNodeRequest {
                node_type: "Sprite2D".into(),
                name: String::new(),
                parent_path: ".".into(),
            }))
            .await
            .unwrap();
        assert_eq!(text_of(&result), "Success: Node created at Root/Sprite2D");
    }

    #[tokio::test]
    async fn remote_errors_are_projected_verbatim() {
        let mcp = mcp_with_stub("{\"error\":\"Node not found: Enemy\"}\n").await;
        let result = mcp
            .godot_delete_node(Parameters(NodePathRequest {
                path: "Enemy".into(),
            }))
            .await
            .unwrap();
        assert_eq!(text_of(&result), "Error: Node not found: Enemy");
    }

    #[tokio::test]
    async fn execute_code_error_carries_the_source() {
        let mcp =
            mcp_with_stub("{\"error\":\"Parse Error\",\"source\":\"func eval(ei):\\n  ret\"}\n")
                .await;
        let result = mcp
            .godot_execute_code(Parameters(ExecuteCodeRequest {
                code: "ret".into(),
            }))
            .await
            .unwrap();
        assert_eq!(
            text_of(&result),
            "Script Error: Parse Error\nSource:\nfunc eval(ei):\n  ret"
        );
    }

    #[tokio::test]
    async fn execute_code_success_renders_the_result() {
        let mcp = mcp_with_stub("{\"result\":\"Root\"}\n").await;
        let result = mcp
            .godot_execute_code(Parameters(ExecuteCodeRequest {
                code: "return EditorInterface.get_edited_scene_root().name".into(),
            }))
            .await
            .unwrap();
        assert_eq!(text_of(&result), "Result: Root");
    }

    #[tokio::test]
    async fn scene_tree_pretty_prints_the_tree_field() {
        let mcp =
            mcp_with_stub("{\"tree\":{\"name\":\"Root\",\"children\":[]}}\n").await;
        let result = mcp.godot_get_scene_tree().await.unwrap();
        let message = text_of(&result);
        assert!(message.contains("\"name\": \"Root\""));
        assert!(!message.contains("\"tree\""));
    }

    #[tokio::test]
    async fn selection_defaults_to_an_empty_list() {
        let mcp = mcp_with_stub("{\"result\":\"ok\"}\n").await;
        let result = mcp.godot_get_selection().await.unwrap();
        assert_eq!(text_of(&result), "[]");
    }

    #[tokio::test]
    async fn get_state_dumps_transport_failures_as_json() {
        let mcp = mcp_at_closed_port().await;
        let result = mcp.godot_get_state().await.unwrap();
        let parsed: Value = serde_json::from_str(&text_of(&result)).unwrap();
        assert!(parsed.get("error").is_some());
    }

    #[tokio::test]
    async fn editor_screenshot_reports_length_only() {
        let mcp = mcp_with_stub("{\"image_base64\":\"aGVsbG8=\"}\n").await;
        let result = mcp.godot_get_editor_screenshot().await.unwrap();
        assert_eq!(text_of(&result), "Screenshot captured (base64 PNG, 8 chars)");
    }

    // Local validation paths: the bridge points at a closed port, so any
    // network attempt would surface as a connection error instead of the
    // expected message.

    #[tokio::test]
    async fn unknown_signal_action_never_reaches_the_wire() {
        let mcp = mcp_at_closed_port().await;
        let result = mcp
            .godot_signal(Parameters(SignalRequest {
                source: "Player".into(),
                signal: "hit".into(),
                target: "Hud".into(),
                method: "_on_hit".into(),
                action: "toggle".into(),
            }))
            .await
            .unwrap();
        assert_eq!(
            text_of(&result),
            "Error: Unknown action 'toggle'. Use 'connect' or 'disconnect'."
        );
    }

    #[tokio::test]
    async fn animation_play_requires_a_name() {
        let mcp = mcp_at_closed_port().await;
        let result = mcp
            .godot_animation(Parameters(AnimationRequest {
                player_path: "Anim".into(),
                action: "play".into(),
                animation: String::new(),
                start_time: 0.0,
                backwards: false,
            }))
            .await
            .unwrap();
        assert_eq!(
            text_of(&result),
            "Error: 'animation' parameter required for play action"
        );
    }

    #[tokio::test]
    async fn group_membership_actions_require_a_group() {
        let mcp = mcp_at_closed_port().await;
        let result = mcp
            .godot_group(Parameters(GroupRequest {
                path: "Enemy".into(),
                action: "add".into(),
                group: String::new(),
            }))
            .await
            .unwrap();
        assert_eq!(
            text_of(&result),
            "Error: 'group' parameter required for add action"
        );
    }

    #[tokio::test]
    async fn uid_rejects_unknown_prefixes_locally() {
        let mcp = mcp_at_closed_port().await;
        let result = mcp
            .godot_uid(Parameters(UidRequest {
                value: "user://save.json".into(),
            }))
            .await
            .unwrap();
        assert_eq!(
            text_of(&result),
            "Error: Value must start with 'uid://' or 'res://'"
        );
    }

    #[tokio::test]
    async fn save_game_data_validates_json_before_sending() {
        let mcp = mcp_at_closed_port().await;
        let result = mcp
            .godot_save_game_data(Parameters(SaveGameDataRequest {
                filename: "save.json".into(),
                data: "{not json".into(),
            }))
            .await
            .unwrap();
        assert!(text_of(&result).starts_with("Error: Invalid JSON data - "));
    }

    #[tokio::test]
    async fn uid_forwards_to_the_right_method() {
        let mcp = mcp_with_stub("{\"path\":\"res://player.tscn\"}\n").await;
        let result = mcp
            .godot_uid(Parameters(UidRequest {
                value: "uid://abc123".into(),
            }))
            .await
            .unwrap();
        assert_eq!(text_of(&result), "res://player.tscn");
    }

    #[tokio::test]
    async fn read_script_returns_plain_content() {
        let mcp = mcp_with_stub("{\"content\":\"extends Node\\n\"}\n").await;
        let result = mcp
            .godot_read_script(Parameters(ResourcePathRequest {
                path: "res://player.gd".into(),
            }))
            .await
            .unwrap();
        assert_eq!(text_of(&result), "extends Node\n");
    }

    #[tokio::test]
    async fn dump_tools_render_the_whole_reply() {
        let mcp = mcp_with_stub("{\"result\":\"ok\",\"filename\":\"save.json\"}\n").await;
        let result = mcp
            .godot_load_game_data(Parameters(LoadGameDataRequest {
                filename: "save.json".into(),
            }))
            .await
            .unwrap();
        let parsed: Value = serde_json::from_str(&text_of(&result)).unwrap();
        assert_eq!(parsed["filename"], "save.json");
        assert_eq!(parsed["result"], "ok");
    }
}
