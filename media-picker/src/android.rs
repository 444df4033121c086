// Android bridge
//
// Permissions and pickers are handled by the app's MainActivity. Rust finds the
// activity instance over JNI, starts the request with the options as a JSON
// string and polls a static getter until the activity has stored an answer.

use crate::models::{Capability, CaptureOptions, PermissionPrompt, PermissionStatus, PickerResponse};
use crate::permission::{PermissionError, PermissionProvider};
use crate::picker::{LaunchError, MediaLauncher};
use async_trait::async_trait;
use jni::objects::{JClass, JObject, JString, JValue};
use jni::JNIEnv;
use ndk_context::android_context;
use std::time::{Duration, Instant};

impl From<String> for PermissionError {
    fn from(msg: String) -> Self {
        PermissionError::Bridge(msg)
    }
}

const DEFAULT_MAIN_ACTIVITY_CLASS: &str = "dev/dioxus/main/MainActivity";

/// Where to find the activity and how to wait for it
#[derive(Debug, Clone)]
pub struct AndroidBridgeConfig {
    /// Fully qualified class name in slash format (e.g., "com/example/myapp/MainActivity")
    pub main_activity_class: String,
    pub poll_interval: Duration,
    /// Give up after this long; `None` waits until the activity answers
    pub max_wait: Option<Duration>,
}

impl Default for AndroidBridgeConfig {
    fn default() -> Self {
        Self {
            main_activity_class: DEFAULT_MAIN_ACTIVITY_CLASS.to_string(),
            poll_interval: Duration::from_millis(100),
            max_wait: None,
        }
    }
}

fn get_app_class_loader<'a>(env: &mut JNIEnv<'a>) -> Result<JObject<'a>, String> {
    let at_cls = env
        .find_class("android/app/ActivityThread")
        .map_err(|e| format!("ActivityThread not found: {}", e))?;
    let at = env
        .call_static_method(
            &at_cls,
            "currentActivityThread",
            "()Landroid/app/ActivityThread;",
            &[],
        )
        .and_then(|v| v.l())
        .map_err(|e| format!("currentActivityThread failed: {}", e))?;

    let app = env
        .call_method(&at, "getApplication", "()Landroid/app/Application;", &[])
        .and_then(|v| v.l())
        .map_err(|e| format!("getApplication failed: {}", e))?;

    // Fall back to the system context before the application exists
    let ctx = if app.is_null() {
        env.call_method(&at, "getSystemContext", "()Landroid/app/ContextImpl;", &[])
            .and_then(|v| v.l())
            .map_err(|e| format!("getSystemContext failed: {}", e))?
    } else {
        app
    };

    env.call_method(&ctx, "getClassLoader", "()Ljava/lang/ClassLoader;", &[])
        .and_then(|v| v.l())
        .map_err(|e| format!("getClassLoader failed: {}", e))
}

fn load_class<'a>(
    env: &mut JNIEnv<'a>,
    loader: &JObject<'a>,
    fq_slash: &str,
) -> Result<JClass<'a>, String> {
    // ClassLoader.loadClass wants dots
    let name = JObject::from(
        env.new_string(fq_slash.replace('/', "."))
            .map_err(|e| format!("new_string failed: {}", e))?,
    );
    let cls_obj = env
        .call_method(
            loader,
            "loadClass",
            "(Ljava/lang/String;)Ljava/lang/Class;",
            &[JValue::Object(&name)],
        )
        .and_then(|v| v.l())
        .map_err(|e| format!("ClassLoader.loadClass failed: {}", e))?;
    Ok(JClass::from(cls_obj))
}

fn clear_exception(env: &mut JNIEnv) {
    if env.exception_check().unwrap_or(false) {
        let _ = env.exception_clear();
    }
}

fn companion_instance<'a>(
    env: &mut JNIEnv<'a>,
    cls: &JClass<'a>,
    class_name: &str,
) -> Result<JObject<'a>, String> {
    let signature = format!("()L{};", class_name);
    let comp_signature = format!("L{}$Companion;", class_name);
    let comp = env
        .get_static_field(cls, "Companion", &comp_signature)
        .and_then(|v| v.l())
        .map_err(|e| format!("Failed to get Companion field: {}", e))?;
    if comp.is_null() {
        return Err("MainActivity.Companion is null - activity not initialized?".to_string());
    }
    env.call_method(&comp, "getInstance", &signature, &[])
        .and_then(|v| v.l())
        .map_err(|e| format!("Companion.getInstance() failed: {}", e))
}

/// Resolves the activity via `getInstance()`, the `instance` field or the
/// Kotlin companion, in that order.
fn get_activity_instance<'a>(
    env: &mut JNIEnv<'a>,
    config: &AndroidBridgeConfig,
) -> Result<(JObject<'a>, JClass<'a>), String> {
    let class_name = config.main_activity_class.as_str();
    let loader = get_app_class_loader(env)?;
    let cls = load_class(env, &loader, class_name)?;
    let signature = format!("()L{};", class_name);

    let instance = match env
        .call_static_method(&cls, "getInstance", &signature, &[])
        .and_then(|v| v.l())
    {
        Ok(inst) => inst,
        Err(_) => {
            clear_exception(env);
            match env
                .get_static_field(&cls, "instance", &signature)
                .and_then(|v| v.l())
            {
                Ok(inst) if !inst.is_null() => inst,
                _ => {
                    clear_exception(env);
                    companion_instance(env, &cls, class_name)?
                }
            }
        }
    };

    if instance.is_null() {
        return Err("MainActivity instance is null - Activity not initialized?".to_string());
    }
    Ok((instance, cls))
}

fn read_static_string(
    env: &mut JNIEnv,
    cls: &JClass,
    getter: &str,
) -> Result<Option<String>, String> {
    let obj = env
        .call_static_method(cls, getter, "()Ljava/lang/String;", &[])
        .and_then(|v| v.l())
        .map_err(|e| format!("{} failed: {}", getter, e))?;
    if obj.is_null() {
        return Ok(None);
    }
    let value: String = env
        .get_string((&obj).into())
        .map_err(|e| format!("String conversion failed: {}", e))?
        .into();
    Ok(Some(value))
}

/// Polls `getter` until it yields a value
fn poll_static_string(
    env: &mut JNIEnv,
    cls: &JClass,
    getter: &str,
    config: &AndroidBridgeConfig,
) -> Result<String, String> {
    let started = Instant::now();
    loop {
        std::thread::sleep(config.poll_interval);
        if let Some(value) = read_static_string(env, cls, getter)? {
            return Ok(value);
        }
        if let Some(max) = config.max_wait {
            if started.elapsed() >= max {
                return Err(format!("{} gave no answer within {:?}", getter, max));
            }
        }
    }
}

fn with_env<T, E: From<String>>(f: impl FnOnce(&mut JNIEnv) -> Result<T, E>) -> Result<T, E> {
    let vm_ptr = android_context().vm() as *mut *const jni::sys::JNIInvokeInterface_;
    let vm = unsafe { jni::JavaVM::from_raw(vm_ptr) }
        .map_err(|e| E::from(format!("JavaVM failed: {}", e)))?;
    let mut env = vm
        .attach_current_thread()
        .map_err(|e| E::from(format!("JNI attach failed: {}", e)))?;
    f(&mut env)
}

fn java_string<'a>(env: &mut JNIEnv<'a>, s: &str) -> Result<JObject<'a>, String> {
    let js: JString = env
        .new_string(s)
        .map_err(|e| format!("new_string failed: {}", e))?;
    Ok(JObject::from(js))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaSource {
    Camera,
    Library,
}

impl MediaSource {
    fn launch_method(&self) -> &'static str {
        match self {
            MediaSource::Camera => "launchCameraWithOptions",
            MediaSource::Library => "launchImageLibraryWithOptions",
        }
    }
}

/// Camera or gallery picker running in MainActivity
#[derive(Debug, Clone)]
pub struct AndroidLauncher {
    source: MediaSource,
    config: AndroidBridgeConfig,
}

impl AndroidLauncher {
    pub fn new(source: MediaSource, config: AndroidBridgeConfig) -> Self {
        Self { source, config }
    }

    fn launch_blocking(
        source: MediaSource,
        config: &AndroidBridgeConfig,
        options_json: &str,
    ) -> Result<String, String> {
        with_env(|env| {
            let (activity, main_cls) = get_activity_instance(env, config)?;

            env.call_static_method(&main_cls, "clearLastPickerResponse", "()V", &[])
                .map_err(|e| format!("clearLastPickerResponse failed: {}", e))?;

            let options = java_string(env, options_json)?;
            let method = source.launch_method();
            env.call_method(
                &activity,
                method,
                "(Ljava/lang/String;)V",
                &[JValue::Object(&options)],
            )
            .map_err(|e| {
                clear_exception(env);
                format!("{} failed: {}", method, e)
            })?;

            poll_static_string(env, &main_cls, "getLastPickerResponse", config)
        })
    }
}

#[async_trait(?Send)]
impl MediaLauncher for AndroidLauncher {
    async fn launch(&self, options: &CaptureOptions) -> Result<PickerResponse, LaunchError> {
        let options_json =
            serde_json::to_string(options).map_err(|e| LaunchError::Malformed(e.to_string()))?;
        let source = self.source;
        let config = self.config.clone();
        log::debug!("Launching {:?} picker with {}", source, options_json);

        let raw = tokio::task::spawn_blocking(move || {
            Self::launch_blocking(source, &config, &options_json)
        })
        .await
        .map_err(|e| LaunchError::Bridge(e.to_string()))?
        .map_err(LaunchError::Bridge)?;

        log::debug!("Picker response = {}", raw);
        PickerResponse::from_json(&raw).map_err(|e| LaunchError::Malformed(e.to_string()))
    }
}

/// Runtime permissions through MainActivity
#[derive(Debug, Clone, Default)]
pub struct AndroidPermissions {
    config: AndroidBridgeConfig,
}

impl AndroidPermissions {
    pub fn new(config: AndroidBridgeConfig) -> Self {
        Self { config }
    }

    fn request_blocking(
        config: &AndroidBridgeConfig,
        capability: Capability,
        prompt: &PermissionPrompt,
    ) -> Result<String, PermissionError> {
        with_env(|env| {
            let (activity, main_cls) =
                get_activity_instance(env, config).map_err(PermissionError::Bridge)?;
            env.call_static_method(&main_cls, "clearPermissionStatus", "()V", &[])
                .map_err(|e| {
                    PermissionError::Bridge(format!("clearPermissionStatus failed: {}", e))
                })?;

            let permission = java_string(env, capability.android_permission())
                .map_err(PermissionError::Bridge)?;
            let title = java_string(env, &prompt.title).map_err(PermissionError::Bridge)?;
            let message = java_string(env, &prompt.message).map_err(PermissionError::Bridge)?;
            env.call_method(
                &activity,
                "requestAppPermission",
                "(Ljava/lang/String;Ljava/lang/String;Ljava/lang/String;)V",
                &[
                    JValue::Object(&permission),
                    JValue::Object(&title),
                    JValue::Object(&message),
                ],
            )
            .map_err(|e| {
                clear_exception(env);
                PermissionError::Request(format!("requestAppPermission threw: {}", e))
            })?;

            poll_static_string(env, &main_cls, "getPermissionStatus", config)
                .map_err(PermissionError::Bridge)
        })
    }
}

#[async_trait]
impl PermissionProvider for AndroidPermissions {
    async fn request(
        &self,
        capability: Capability,
        prompt: &PermissionPrompt,
    ) -> Result<PermissionStatus, PermissionError> {
        let config = self.config.clone();
        let prompt = prompt.clone();
        let raw = tokio::task::spawn_blocking(move || {
            Self::request_blocking(&config, capability, &prompt)
        })
        .await
        .map_err(|e| PermissionError::Bridge(e.to_string()))??;
        Ok(PermissionStatus::from_bridge(&raw))
    }
}
