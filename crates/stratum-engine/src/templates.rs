//! Embedded manifest templates
//!
//! One template per manifest document. The render context keys are the
//! resolved fields of a `Deployable` plus the deduplicated `ports` list
//! and the derived chart `version`; nothing here performs lookups.

pub const CHART: &str = "\
apiVersion: v1
description: A Helm chart for Kubernetes {{ artifact.name }}
name: {{ artifact.name }}
version: {{ version }}
";

pub const SERVICE_ACCOUNT: &str = "\
apiVersion: v1
kind: ServiceAccount
metadata:
  name: {{ artifact.name|lower }}
  namespace: {{ namespace }}
{%- if metadata.annotations %}
  annotations:
{%- for key, value in metadata.annotations|items %}
    {{ key }}: {{ value|squote }}
{%- endfor %}
{%- endif %}
{%- if metadata.labels %}
  labels:
{%- for key, value in metadata.labels|items %}
    {{ key }}: {{ value|squote }}
{%- endfor %}
{%- endif %}
";

pub const SERVICE: &str = "\
apiVersion: v1
kind: Service
metadata:
  name: {{ artifact.name|lower }}
  namespace: {{ namespace }}
{%- if metadata.annotations %}
  annotations:
{%- for key, value in metadata.annotations|items %}
    {{ key }}: {{ value|squote }}
{%- endfor %}
{%- endif %}
{%- if metadata.labels %}
  labels:
{%- for key, value in metadata.labels|items %}
    {{ key }}: {{ value|squote }}
{%- endfor %}
{%- endif %}
spec:
  type: ClusterIP
{%- if ports %}
  ports:
{%- for port in ports %}
    - name: {{ port.name }}
      port: {{ port.port }}
      targetPort: {{ port.targetPort }}
      protocol: {{ port.protocol }}
{%- endfor %}
{%- endif %}
{%- if metadata.selectorLabels %}
  selector:
{%- for key, value in metadata.selectorLabels|items %}
    {{ key }}: {{ value }}
{%- endfor %}
{%- endif %}
";

pub const DEPLOYMENT: &str = "\
apiVersion: apps/v1
kind: Deployment
metadata:
  name: {{ artifact.name|lower }}
  namespace: {{ namespace }}
{%- if metadata.annotations %}
  annotations:
{%- for key, value in metadata.annotations|items %}
    {{ key }}: {{ value|squote }}
{%- endfor %}
{%- endif %}
{%- if metadata.labels %}
  labels:
{%- for key, value in metadata.labels|items %}
    {{ key }}: {{ value|squote }}
{%- endfor %}
{%- endif %}
spec:
  replicas: {{ target.replica }}
  selector:
{%- if metadata.selectorLabels %}
    matchLabels:
{%- for key, value in metadata.selectorLabels|items %}
      {{ key }}: {{ value }}
{%- endfor %}
{%- endif %}
  template:
    metadata:
{%- if metadata.selectorLabels %}
      labels:
{%- for key, value in metadata.selectorLabels|items %}
        {{ key }}: {{ value }}
{%- endfor %}
{%- endif %}
    spec:
      serviceAccountName: {{ service_account_name if service_account_name else artifact.name|lower }}
      containers:
        - name: {{ artifact.name }}
          image: {{ artifact.image }}
          imagePullPolicy: IfNotPresent
{%- if args %}
{%- if args.entrypoint is defined %}
          command:
{%- for entry in args.entrypoint %}
            - {{ entry|squote }}
{%- endfor %}
{%- endif %}
{%- if args.command is defined %}
          args:
{%- for arg in args.command %}
            - {{ arg|squote }}
{%- endfor %}
{%- endif %}
{%- endif %}
{%- if service_enabled %}
          ports:
{%- for port in ports %}
            - name: {{ port.name }}
              containerPort: {{ port.port }}
              protocol: {{ port.protocol }}
{%- endfor %}
{%- endif %}
{%- if checks %}
          livenessProbe:
            httpGet:
              path: {{ checks.path }}
              port: {{ checks.port }}
            initialDelaySeconds: 30
            timeoutSeconds: 100
          readinessProbe:
            httpGet:
              path: {{ checks.path }}
              port: {{ checks.port }}
            initialDelaySeconds: 30
            timeoutSeconds: 100
{%- endif %}
{%- if resources %}
          resources:
{%- if resources.requests is defined %}
            requests:
{%- if resources.requests.cpu is defined %}
              cpu: {{ resources.requests.cpu|quote }}
{%- endif %}
{%- if resources.requests.memory is defined %}
              memory: {{ resources.requests.memory|quote }}
{%- endif %}
{%- endif %}
{%- if resources.limits is defined %}
            limits:
{%- if resources.limits.cpu is defined %}
              cpu: {{ resources.limits.cpu|quote }}
{%- endif %}
{%- if resources.limits.memory is defined %}
              memory: {{ resources.limits.memory|quote }}
{%- endif %}
{%- endif %}
{%- endif %}
{%- if env %}
          env:
{%- for key, value in env|items %}
            - name: {{ key|upper|quote }}
              value: {{ value|quote }}
{%- endfor %}
{%- endif %}
{%- if mounts %}
          volumeMounts:
{%- for mount in mounts %}
            - name: {{ mount.name }}
              mountPath: {{ mount.path }}
{%- endfor %}
{%- endif %}
{%- if security_context %}
          securityContext:
{%- if security_context.allowPrivilegeEscalation is defined %}
            allowPrivilegeEscalation: {{ security_context.allowPrivilegeEscalation }}
{%- endif %}
{%- if security_context.readOnlyRootFilesystem is defined %}
            readOnlyRootFilesystem: {{ security_context.readOnlyRootFilesystem }}
{%- endif %}
{%- if security_context.runAsNonRoot is defined %}
            runAsNonRoot: {{ security_context.runAsNonRoot }}
{%- endif %}
{%- if security_context.runAsUser is defined %}
            runAsUser: {{ security_context.runAsUser }}
{%- endif %}
{%- endif %}
{%- if security_context %}
      securityContext:
{%- if security_context.runAsNonRoot is defined %}
        runAsNonRoot: {{ security_context.runAsNonRoot }}
{%- endif %}
{%- if security_context.runAsUser is defined %}
        runAsUser: {{ security_context.runAsUser }}
{%- endif %}
{%- endif %}
{%- if target.nodeSelector %}
      nodeSelector:
{%- for key, value in target.nodeSelector|items %}
        {{ key }}: {{ value }}
{%- endfor %}
{%- endif %}
      affinity: { }
      tolerations: [ ]
{%- if mounts %}
      volumes:
{%- for mount in mounts %}
        - name: {{ mount.name }}
{%- if mount.type == \"emptyDir\" %}
          emptyDir: { }
{%- endif %}
{%- endfor %}
{%- endif %}
";

pub const JOB: &str = "\
apiVersion: batch/v1
kind: Job
metadata:
  name: {{ artifact.name|lower }}
  namespace: {{ namespace }}
{%- if metadata.annotations %}
  annotations:
{%- for key, value in metadata.annotations|items %}
    {{ key }}: {{ value|squote }}
{%- endfor %}
{%- endif %}
{%- if metadata.labels %}
  labels:
{%- for key, value in metadata.labels|items %}
    {{ key }}: {{ value|squote }}
{%- endfor %}
{%- endif %}
spec:
  completions: {{ target.replica }}
  template:
    metadata:
{%- if metadata.selectorLabels %}
      labels:
{%- for key, value in metadata.selectorLabels|items %}
        {{ key }}: {{ value }}
{%- endfor %}
{%- endif %}
    spec:
      serviceAccountName: {{ service_account_name if service_account_name else artifact.name|lower }}
      containers:
        - name: {{ artifact.name }}
          image: {{ artifact.image }}
          imagePullPolicy: IfNotPresent
{%- if args %}
{%- if args.entrypoint is defined %}
          command:
{%- for entry in args.entrypoint %}
            - {{ entry|squote }}
{%- endfor %}
{%- endif %}
{%- if args.command is defined %}
          args:
{%- for arg in args.command %}
            - {{ arg|squote }}
{%- endfor %}
{%- endif %}
{%- endif %}
{%- if resources %}
          resources:
{%- if resources.requests is defined %}
            requests:
{%- if resources.requests.cpu is defined %}
              cpu: {{ resources.requests.cpu|quote }}
{%- endif %}
{%- if resources.requests.memory is defined %}
              memory: {{ resources.requests.memory|quote }}
{%- endif %}
{%- endif %}
{%- if resources.limits is defined %}
            limits:
{%- if resources.limits.cpu is defined %}
              cpu: {{ resources.limits.cpu|quote }}
{%- endif %}
{%- if resources.limits.memory is defined %}
              memory: {{ resources.limits.memory|quote }}
{%- endif %}
{%- endif %}
{%- endif %}
{%- if env %}
          env:
{%- for key, value in env|items %}
            - name: {{ key|upper|quote }}
              value: {{ value|quote }}
{%- endfor %}
{%- endif %}
{%- if mounts %}
          volumeMounts:
{%- for mount in mounts %}
            - name: {{ mount.name }}
              mountPath: {{ mount.path }}
{%- endfor %}
{%- endif %}
{%- if security_context %}
          securityContext:
{%- if security_context.allowPrivilegeEscalation is defined %}
            allowPrivilegeEscalation: {{ security_context.allowPrivilegeEscalation }}
{%- endif %}
{%- if security_context.readOnlyRootFilesystem is defined %}
            readOnlyRootFilesystem: {{ security_context.readOnlyRootFilesystem }}
{%- endif %}
{%- if security_context.runAsNonRoot is defined %}
            runAsNonRoot: {{ security_context.runAsNonRoot }}
{%- endif %}
{%- if security_context.runAsUser is defined %}
            runAsUser: {{ security_context.runAsUser }}
{%- endif %}
{%- endif %}
      restartPolicy: Never
{%- if target.nodeSelector %}
      nodeSelector:
{%- for key, value in target.nodeSelector|items %}
        {{ key }}: {{ value }}
{%- endfor %}
{%- endif %}
      affinity: { }
      tolerations: [ ]
{%- if mounts %}
      volumes:
{%- for mount in mounts %}
        - name: {{ mount.name }}
{%- if mount.type == \"emptyDir\" %}
          emptyDir: { }
{%- endif %}
{%- endfor %}
{%- endif %}
";
